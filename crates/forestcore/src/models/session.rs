//! In-progress registration: the step cursor and the partial record

use strum::{Display, EnumIter};

use super::user::UserRecord;

/// Position in the fixed registration dialogue.
///
/// Strictly ordered and forward-only; each state has exactly one successor
/// except `Complete`, which has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum RegistrationStep {
    FirstName,
    LastName,
    Phone,
    Email,
    Address,
    Complete,
}

impl RegistrationStep {
    /// The single allowed transition out of this state.
    pub fn next(self) -> Option<RegistrationStep> {
        match self {
            RegistrationStep::FirstName => Some(RegistrationStep::LastName),
            RegistrationStep::LastName => Some(RegistrationStep::Phone),
            RegistrationStep::Phone => Some(RegistrationStep::Email),
            RegistrationStep::Email => Some(RegistrationStep::Address),
            RegistrationStep::Address => Some(RegistrationStep::Complete),
            RegistrationStep::Complete => None,
        }
    }

    /// Writes an answer into the field this step collects.
    ///
    /// Returns `false` for `Complete`, which collects nothing.
    pub fn apply(self, record: &mut UserRecord, answer: &str) -> bool {
        let field = match self {
            RegistrationStep::FirstName => &mut record.first_name,
            RegistrationStep::LastName => &mut record.last_name,
            RegistrationStep::Phone => &mut record.phone,
            RegistrationStep::Email => &mut record.email,
            RegistrationStep::Address => &mut record.address,
            RegistrationStep::Complete => return false,
        };
        *field = answer.to_string();
        true
    }
}

/// One user's registration in progress. Never represents a committed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSession {
    pub telegram_id: i64,
    pub step: RegistrationStep,
    pub record: UserRecord,
}

impl RegistrationSession {
    pub fn new(telegram_id: i64, record: UserRecord) -> Self {
        Self {
            telegram_id,
            step: RegistrationStep::FirstName,
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_steps_form_a_single_chain() {
        let mut walked = vec![RegistrationStep::FirstName];
        let mut step = RegistrationStep::FirstName;
        while let Some(next) = step.next() {
            walked.push(next);
            step = next;
        }
        let all: Vec<RegistrationStep> = RegistrationStep::iter().collect();
        assert_eq!(walked, all);
        assert_eq!(RegistrationStep::Complete.next(), None);
    }

    #[test]
    fn test_apply_writes_the_field_for_the_step() {
        let mut record = UserRecord::default();
        assert!(RegistrationStep::Phone.apply(&mut record, "+7 900"));
        assert_eq!(record.phone, "+7 900");
        assert!(record.first_name.is_empty());

        assert!(!RegistrationStep::Complete.apply(&mut record, "ignored"));
        assert_eq!(record, UserRecord { phone: "+7 900".to_string(), ..UserRecord::default() });
    }
}
