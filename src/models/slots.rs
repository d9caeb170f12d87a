use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    Origin,
    Destination,
    DepartureDate,
    ReturnDate,
    Budget,
}

impl SlotKey {
    /// Priority order in which missing slots are asked for.
    pub const ALL: [SlotKey; 5] = [
        SlotKey::Origin,
        SlotKey::Destination,
        SlotKey::DepartureDate,
        SlotKey::ReturnDate,
        SlotKey::Budget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKey::Origin => "origin",
            SlotKey::Destination => "destination",
            SlotKey::DepartureDate => "departure_date",
            SlotKey::ReturnDate => "return_date",
            SlotKey::Budget => "budget",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        SlotKey::ALL.into_iter().find(|k| k.as_str() == s)
    }

    pub fn question(&self) -> &'static str {
        match self {
            SlotKey::Origin => "What is your departure city?",
            SlotKey::Destination => "What is your destination city?",
            SlotKey::DepartureDate => "When do you want to depart? (e.g., 2026-07-10)",
            SlotKey::ReturnDate => "When do you want to return? (e.g., 2026-07-15)",
            SlotKey::Budget => "What is your maximum budget? (e.g., 500 EUR)",
        }
    }
}

/// The five booking fields. Values are free-form; a set value is never cleared.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SlotSet {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub budget: Option<String>,
}

impl SlotSet {
    pub fn get(&self, key: SlotKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn set(&mut self, key: SlotKey, value: impl Into<String>) {
        *self.slot_mut(key) = Some(value.into());
    }

    pub fn missing(&self) -> Vec<SlotKey> {
        SlotKey::ALL
            .into_iter()
            .filter(|k| self.slot(*k).is_none())
            .collect()
    }

    /// Overwrites every slot for which `updates` carries a value. Nulls are ignored.
    pub fn apply(&mut self, updates: &SlotSet) {
        for key in SlotKey::ALL {
            if let Some(value) = updates.slot(key) {
                *self.slot_mut(key) = Some(value.clone());
            }
        }
    }

    fn slot(&self, key: SlotKey) -> &Option<String> {
        match key {
            SlotKey::Origin => &self.origin,
            SlotKey::Destination => &self.destination,
            SlotKey::DepartureDate => &self.departure_date,
            SlotKey::ReturnDate => &self.return_date,
            SlotKey::Budget => &self.budget,
        }
    }

    fn slot_mut(&mut self, key: SlotKey) -> &mut Option<String> {
        match key {
            SlotKey::Origin => &mut self.origin,
            SlotKey::Destination => &mut self.destination,
            SlotKey::DepartureDate => &mut self.departure_date,
            SlotKey::ReturnDate => &mut self.return_date,
            SlotKey::Budget => &mut self.budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_in_priority_order() {
        let mut slots = SlotSet::default();
        slots.set(SlotKey::Destination, "Tokyo");
        slots.set(SlotKey::ReturnDate, "2026-03-20");

        assert_eq!(
            slots.missing(),
            vec![SlotKey::Origin, SlotKey::DepartureDate, SlotKey::Budget]
        );
    }

    #[test]
    fn test_apply_ignores_nulls() {
        let mut slots = SlotSet::default();
        slots.set(SlotKey::Origin, "Paris");

        let updates = SlotSet {
            destination: Some("Tokyo".to_string()),
            ..Default::default()
        };
        slots.apply(&updates);

        assert_eq!(slots.get(SlotKey::Origin), Some("Paris"));
        assert_eq!(slots.get(SlotKey::Destination), Some("Tokyo"));
        assert_eq!(slots.missing().len(), 3);
    }

    #[test]
    fn test_apply_overwrites_with_new_value() {
        let mut slots = SlotSet::default();
        slots.set(SlotKey::Destination, "Tokyo");
        slots.apply(&SlotSet {
            destination: Some("Rome".to_string()),
            ..Default::default()
        });
        assert_eq!(slots.get(SlotKey::Destination), Some("Rome"));
    }

    #[test]
    fn test_missing_shrinks_as_slots_fill() {
        let mut slots = SlotSet::default();
        for (filled, key) in SlotKey::ALL.into_iter().enumerate() {
            assert_eq!(slots.missing().len(), 5 - filled);
            slots.set(key, "x");
        }
        assert!(slots.missing().is_empty());
    }

    #[test]
    fn test_serializes_all_keys_in_order() {
        let mut slots = SlotSet::default();
        slots.set(SlotKey::Budget, "800 EUR");
        let json = serde_json::to_string(&slots).unwrap();
        assert_eq!(
            json,
            r#"{"origin":null,"destination":null,"departure_date":null,"return_date":null,"budget":"800 EUR"}"#
        );
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(SlotKey::parse("departure_date"), Some(SlotKey::DepartureDate));
        assert_eq!(SlotKey::parse("none"), None);
    }
}
