use crate::errors::ValidationError;
use crate::models::{Entry, EntryForm, GoalForm};
use chrono::NaiveDate;

impl EntryForm {
    pub fn parse(&self) -> Result<Entry, ValidationError> {
        let date = field(&self.date).ok_or(ValidationError::MissingDate)?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate)?;

        let weight = match field(&self.weight) {
            Some(raw) => {
                let value: f64 = raw.parse().map_err(|_| ValidationError::InvalidWeight)?;
                if !value.is_finite() {
                    return Err(ValidationError::InvalidWeight);
                }
                Some(value)
            }
            None => None,
        };

        let calories = field(&self.calories)
            .map(|raw| raw.parse::<i64>().map_err(|_| ValidationError::InvalidCalories))
            .transpose()?;
        let steps = field(&self.steps)
            .map(|raw| raw.parse::<i64>().map_err(|_| ValidationError::InvalidSteps))
            .transpose()?;

        Ok(Entry {
            date,
            weight,
            calories,
            steps,
        })
    }
}

impl GoalForm {
    pub fn parse(&self) -> Result<i64, ValidationError> {
        let raw = field(&self.calorie_goal).ok_or(ValidationError::MissingGoal)?;
        raw.parse().map_err(|_| ValidationError::InvalidGoal)
    }
}

// Browsers submit empty inputs as "", which counts as absent.
fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|raw| !raw.is_empty())
}
