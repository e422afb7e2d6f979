//! `#[derive(Signal)]` on user types.

use crossflow::{Bits, Signal, Valid};

#[derive(Debug, Clone, Default, PartialEq, Eq, Signal)]
#[width(3)]
enum Opcode {
    #[default]
    Nop,
    Load,
    #[encode(5)]
    Store,
    #[encode(7)]
    Flush,
}

#[derive(Debug, Clone, Default, PartialEq, Signal)]
struct Command {
    opcode: Opcode,
    addr: Bits<12>,
    tag: Valid<u8>,
}

#[test]
fn enum_uses_explicit_encodings() {
    assert_eq!(Opcode::WIDTH, 3);
    assert_eq!(Opcode::Store.transl(), vec![true, false, true]);
    assert_eq!(Opcode::untransl(&[true, true, true]), Opcode::Flush);
    assert_eq!(Opcode::untransl(&[true, false, false]), Opcode::Load);

    // Unused encodings decode to the first variant.
    assert_eq!(Opcode::untransl(&[false, true, false]), Opcode::Nop);
}

#[test]
fn struct_concatenates_fields() {
    assert_eq!(Command::WIDTH, 3 + 12 + 9);
    let command = Command { opcode: Opcode::Store, addr: Bits::from(0xABCu128), tag: Valid::valid(0x42) };
    let bits = command.clone().transl();
    assert_eq!(bits.len(), Command::WIDTH);
    assert_eq!(&bits[..3], &[true, false, true]);
    assert!(bits[Command::WIDTH - 1]);
    assert_eq!(Command::untransl(&bits), command);
}
