use proc_macro::{self, TokenStream};
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use super::utils::{clog2, get_enum_encode_value, get_enum_width};

pub fn derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let name = &ast.ident;
    match ast.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(syn::FieldsNamed { ref named, .. }), ..
        }) => {
            let fields = named;

            let ty_widths = fields.iter().map(|f| {
                let ty = &f.ty;
                quote! { + <#ty as Signal>::WIDTH }
            });

            // fields for `transl`.
            let into_fields = fields.iter().map(|f| {
                let name = &f.ident;
                quote! { .chain(self.#name.transl()) }
            });

            // fields for `untransl`, sliced in declaration order.
            let from_fields = fields.iter().map(|f| {
                let name = &f.ident;
                let ty = &f.ty;
                quote! {
                    let #name = {
                        let width = <#ty as Signal>::WIDTH;
                        let value = <#ty as Signal>::untransl(&bits[offset..offset + width]);
                        offset += width;
                        value
                    };
                }
            });

            let field_names = fields.iter().map(|f| &f.ident);

            let expanded = quote! {
                impl #impl_generics Signal for #name #ty_generics #where_clause {
                    const WIDTH: usize = 0 #(#ty_widths)*;

                    fn transl(self) -> Vec<bool> {
                        ::std::iter::empty()#(#into_fields)*.collect::<Vec<bool>>()
                    }

                    #[allow(unused_mut, unused_variables)]
                    fn untransl(bits: &[bool]) -> Self {
                        assert_eq!(bits.len(), Self::WIDTH, "bit slice does not match the width of `{}`", stringify!(#name));
                        let mut offset = 0;
                        #(#from_fields)*
                        let _ = offset;
                        Self { #(#field_names,)* }
                    }
                }
            };

            expanded.into()
        }
        syn::Data::Enum(syn::DataEnum { ref variants, .. }) => {
            let variant_count = variants.iter().count();
            assert!(variant_count > 0, "{name}: Empty enums cannot be derived as crossflow `Signal`");
            let width = if let Some(width) = get_enum_width(&ast.attrs) {
                width.base10_parse::<usize>().unwrap_or_else(|_| panic!("{name}: Enum width should be usize"))
            } else if variant_count == 1 {
                1
            } else {
                clog2(variant_count)
            };

            let encodings = variants
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    let variant_name = &f.ident;
                    assert!(
                        matches!(f.fields, syn::Fields::Unit),
                        "{name}::{variant_name}: Only Unit Variant is allowed to be derived as crossflow Signal"
                    );

                    let encode_value = if let Some(encode_value_lit) = get_enum_encode_value(&f.attrs) {
                        encode_value_lit
                            .base10_parse::<usize>()
                            .unwrap_or_else(|_| panic!("encoding value of {name}::{variant_name} should be usize"))
                    } else {
                        i
                    };
                    assert!(
                        width >= usize::BITS as usize || encode_value < (1 << width),
                        "{encode_value}(encoding of {name}::{variant_name}) exceeds maximum for {width} bits",
                    );

                    (variant_name, encode_value)
                })
                .collect::<Vec<_>>();

            let into_variants = encodings.iter().map(|(variant_name, encode_value)| {
                quote! { Self::#variant_name => #encode_value, }
            });

            let from_variants = encodings.iter().map(|(variant_name, encode_value)| {
                quote! { #encode_value => Self::#variant_name, }
            });

            let (first_variant, _) = encodings[0];

            let expanded = quote! {
                impl #impl_generics Signal for #name #ty_generics #where_clause {
                    const WIDTH: usize = #width;

                    fn transl(self) -> Vec<bool> {
                        let encoded: usize = match self {
                            #(#into_variants)*
                        };
                        (0..#width).map(|idx| ((encoded >> idx) & 1) != 0).collect::<Vec<bool>>()
                    }

                    #[allow(unreachable_patterns)]
                    fn untransl(bits: &[bool]) -> Self {
                        assert_eq!(bits.len(), Self::WIDTH, "bit slice does not match the width of `{}`", stringify!(#name));
                        let encoded = bits.iter().enumerate().fold(0usize, |acc, (idx, bit)| acc | (usize::from(*bit) << idx));
                        match encoded {
                            #(#from_variants)*
                            _ => Self::#first_variant,
                        }
                    }
                }
            };

            expanded.into()
        }
        _ => todo!("Signal macro is not implemented for union type"),
    }
}
