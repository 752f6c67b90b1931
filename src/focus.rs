use ihdathi::coords::Field;
use serde::{Deserialize, Serialize};

/// A row of the card that can hold keyboard focus.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusTarget {
    #[default]
    Direction,
    Zone,
    Field(Field),
    Convert,
}

impl FocusTarget {
    pub fn field(&self) -> Option<Field> {
        match self {
            FocusTarget::Field(field) => Some(*field),
            _ => None,
        }
    }
}

/// Steps through `order`, wrapping at both ends.
///
/// A target missing from `order` (hidden by the current direction) moves to
/// the first row.
pub fn step(order: &[FocusTarget], current: FocusTarget, forward: bool) -> FocusTarget {
    let Some(position) = order.iter().position(|target| *target == current) else {
        return order.first().copied().unwrap_or_default();
    };
    let index = if forward {
        (position + 1) % order.len()
    } else {
        (position + order.len() - 1) % order.len()
    };
    order[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UTM_ROWS: [FocusTarget; 5] = [
        FocusTarget::Direction,
        FocusTarget::Zone,
        FocusTarget::Field(Field::Easting),
        FocusTarget::Field(Field::Northing),
        FocusTarget::Convert,
    ];

    #[test]
    fn steps_wrap_around() {
        assert_eq!(
            step(&UTM_ROWS, FocusTarget::Convert, true),
            FocusTarget::Direction
        );
        assert_eq!(
            step(&UTM_ROWS, FocusTarget::Direction, false),
            FocusTarget::Convert
        );
        assert_eq!(
            step(&UTM_ROWS, FocusTarget::Zone, true),
            FocusTarget::Field(Field::Easting)
        );
    }

    #[test]
    fn hidden_target_falls_back_to_first_row() {
        assert_eq!(
            step(&UTM_ROWS, FocusTarget::Field(Field::Latitude), true),
            FocusTarget::Direction
        );
        assert_eq!(step(&[], FocusTarget::Convert, true), FocusTarget::Direction);
    }
}
