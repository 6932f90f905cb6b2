//! Party roster table. The row index is the stable party id used as the
//! join key by every downstream vote, seat and coalition array.

use crate::config::PartyConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct PartyFrame {
    pub names: Vec<String>,
    pub position_x: Vec<f64>,
    pub position_y: Vec<f64>,
    pub valence: Vec<f64>,
    pub incumbent: Vec<bool>,
    pub is_nota: Vec<bool>,
}

impl PartyFrame {
    /// Build the roster from configuration, optionally appending a NOTA
    /// ("none of the above") pseudo-party with zero appeal. NOTA rows
    /// collect votes but are never awarded seats.
    pub fn from_configs(parties: &[PartyConfig], include_nota: bool) -> Self {
        let extra = include_nota as usize;
        let n = parties.len() + extra;
        let mut frame = PartyFrame {
            names: Vec::with_capacity(n),
            position_x: Vec::with_capacity(n),
            position_y: Vec::with_capacity(n),
            valence: Vec::with_capacity(n),
            incumbent: Vec::with_capacity(n),
            is_nota: Vec::with_capacity(n),
        };

        for party in parties {
            frame.names.push(party.name.clone());
            frame.position_x.push(party.position_x);
            frame.position_y.push(party.position_y);
            frame.valence.push(party.valence);
            frame.incumbent.push(party.incumbent);
            frame.is_nota.push(false);
        }

        if include_nota {
            frame.names.push("NOTA".to_string());
            frame.position_x.push(0.0);
            frame.position_y.push(0.0);
            frame.valence.push(0.0);
            frame.incumbent.push(false);
            frame.is_nota.push(true);
        }

        frame
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// (x, y) policy position of one party.
    pub fn position(&self, party: usize) -> (f64, f64) {
        (self.position_x[party], self.position_y[party])
    }

    /// First-axis positions, the dimension coalition connectedness uses.
    pub fn economic_positions(&self) -> &[f64] {
        &self.position_x
    }

    pub fn incumbent_indices(&self) -> Vec<usize> {
        self.incumbent
            .iter()
            .enumerate()
            .filter_map(|(i, &inc)| if inc { Some(i) } else { None })
            .collect()
    }

    /// Mark the listed party names as incumbents (and everyone else not).
    /// Unknown names are ignored; the caller decides whether that matters.
    pub fn set_incumbents_by_name(&mut self, names: &[String]) {
        for (i, name) in self.names.iter().enumerate() {
            self.incumbent[i] = names.iter().any(|n| n == name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_parties;

    #[test]
    fn roster_preserves_order_and_fields() {
        let frame = PartyFrame::from_configs(&default_parties(), false);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.names[0], "Party A");
        assert_eq!(frame.position(1), (0.3, -0.1));
        assert!(!frame.is_nota.iter().any(|&n| n));
    }

    #[test]
    fn nota_appended_last_with_zero_valence() {
        let frame = PartyFrame::from_configs(&default_parties(), true);
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.names[3], "NOTA");
        assert_eq!(frame.valence[3], 0.0);
        assert!(frame.is_nota[3]);
    }

    #[test]
    fn incumbents_by_name() {
        let mut frame = PartyFrame::from_configs(&default_parties(), false);
        frame.set_incumbents_by_name(&["Party B".to_string()]);
        assert_eq!(frame.incumbent_indices(), vec![1]);
    }
}
