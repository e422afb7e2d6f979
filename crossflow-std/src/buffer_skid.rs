//! Skid buffer for valid-ready channels.

use crossflow_macro::Signal;

use crate::*;

/// Skid buffer's state.
#[derive(Debug, Clone, Default, PartialEq, Signal)]
struct State<V: Signal> {
    /// Directly connected to module output.
    m_axis_data: Valid<V>,
    /// Temp register of skid buffer.
    temp_m_axis_data: Valid<V>,
    /// Datapath control.
    m_axis_ready_int: Ready,
}

/// Skid buffer's logic.
fn logic<V: Signal>(i_fwd: Valid<V>, o_bwd: Ready, state: State<V>) -> (Valid<V>, Ready, State<V>) {
    let Valid { inner: skid_buffer_data_int, valid: skid_buffer_valid_int } = i_fwd;

    let m_axis_valid_reg = state.m_axis_data.valid;
    let temp_m_axis_valid_reg = state.temp_m_axis_data.valid;
    let m_axis_ready_int_reg = state.m_axis_ready_int.ready;

    let m_axis_ready = o_bwd.ready;

    // Computes control path predicates.
    let m_axis_valid_int = skid_buffer_valid_int && m_axis_ready_int_reg;
    let m_axis_ready_int_early =
        m_axis_ready || (!temp_m_axis_valid_reg && (!m_axis_valid_reg || !m_axis_valid_int));

    let store_axis_int_to_output = m_axis_ready_int_reg && (m_axis_ready || !m_axis_valid_reg);
    let store_axis_int_to_temp = m_axis_ready_int_reg && !m_axis_ready && m_axis_valid_reg;
    let store_axis_temp_to_output = !m_axis_ready_int_reg && m_axis_ready;

    // Computes next cycle state.
    let m_axis_data_next = if store_axis_int_to_output {
        skid_buffer_data_int.clone()
    } else if store_axis_temp_to_output {
        state.temp_m_axis_data.inner.clone()
    } else {
        state.m_axis_data.inner.clone()
    };
    let temp_m_axis_data_next = if store_axis_int_to_temp {
        skid_buffer_data_int
    } else {
        state.temp_m_axis_data.inner.clone()
    };

    let (m_axis_valid_next, temp_m_axis_valid_next) = if m_axis_ready_int_reg {
        if m_axis_ready || !m_axis_valid_reg {
            (m_axis_valid_int, temp_m_axis_valid_reg)
        } else {
            (m_axis_valid_reg, m_axis_valid_int)
        }
    } else if m_axis_ready {
        (temp_m_axis_valid_reg, false)
    } else {
        (m_axis_valid_reg, temp_m_axis_valid_reg)
    };

    let state_next = State {
        m_axis_data: Valid::new(m_axis_valid_next, m_axis_data_next),
        temp_m_axis_data: Valid::new(temp_m_axis_valid_next, temp_m_axis_data_next),
        m_axis_ready_int: Ready::new(m_axis_ready_int_early),
    };

    (state.m_axis_data, state.m_axis_ready_int, state_next)
}

/// Creates a skid buffer module.
///
/// Both the data path and the ready path are registered. The buffer holds up to two beats, so the
/// registered ready never drops a beat in flight and throughput is one beat per cycle.
pub fn buffer_skid<V: Signal>() -> impl Module<I = VrChannel<V>, O = VrChannel<V>> {
    Fsm::<VrChannel<V>, VrChannel<V>, State<V>, _>::new("buffer_skid", State::default(), logic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skid_absorbs_stall() {
        let mut m = buffer_skid::<u8>();
        // Ready is a register that comes up after the first edge.
        assert!(!m.comb(Valid::valid(1), Ready::new(true)).1.ready);
        m.tick(Valid::invalid(), Ready::new(true));

        assert!(m.comb(Valid::valid(1), Ready::new(true)).1.ready);
        m.tick(Valid::valid(1), Ready::new(false));
        assert_eq!(m.comb(Valid::valid(2), Ready::new(false)).0, Valid::valid(1));

        // Ready was high on the edge, so the second beat is taken into the temp register.
        assert!(m.comb(Valid::valid(2), Ready::new(false)).1.ready);
        m.tick(Valid::valid(2), Ready::new(false));
        assert!(!m.comb(Valid::valid(3), Ready::new(false)).1.ready);

        m.tick(Valid::valid(3), Ready::new(true));
        assert_eq!(m.comb(Valid::valid(3), Ready::new(true)).0, Valid::valid(2));
    }
}
