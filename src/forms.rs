use thiserror::Error;

use crate::api::{LeagueUpdate, NewLeague, NewTeam, StatisticUpdate};
use crate::state::{ApiCommand, Tab};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    CreateLeague,
    UpdateLeague,
    AddTeam,
    UpdateStatistic,
    TrackStatistic,
}

impl FormKind {
    pub fn tab(self) -> Tab {
        match self {
            FormKind::CreateLeague | FormKind::UpdateLeague => Tab::Leagues,
            FormKind::AddTeam => Tab::Teams,
            FormKind::UpdateStatistic | FormKind::TrackStatistic => Tab::Statistics,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::CreateLeague => "Create League",
            FormKind::UpdateLeague => "Update League",
            FormKind::AddTeam => "Add Team",
            FormKind::UpdateStatistic => "Update Statistic",
            FormKind::TrackStatistic => "Track Statistic",
        }
    }

    /// Next mode offered by the same tab's form.
    pub fn next_mode(self) -> FormKind {
        match self {
            FormKind::CreateLeague => FormKind::UpdateLeague,
            FormKind::UpdateLeague => FormKind::CreateLeague,
            FormKind::AddTeam => FormKind::AddTeam,
            FormKind::UpdateStatistic => FormKind::TrackStatistic,
            FormKind::TrackStatistic => FormKind::UpdateStatistic,
        }
    }

    fn fields(self) -> Vec<Field> {
        use FieldKind::{Integer, Optional, Text};
        match self {
            FormKind::CreateLeague => vec![
                Field::new("League ID", Integer),
                Field::new("Name", Text),
                Field::new("Country", Text),
            ],
            FormKind::UpdateLeague => vec![
                Field::new("League ID", Integer),
                Field::new("Name", Optional),
                Field::new("Country", Optional),
            ],
            FormKind::AddTeam => vec![
                Field::new("League ID", Integer),
                Field::new("Team ID", Integer),
                Field::new("Team Name", Text),
                Field::new("Manager", Text),
            ],
            FormKind::UpdateStatistic => vec![
                Field::new("League ID", Integer),
                Field::new("Stat ID", Integer),
                Field::new("Description", Text),
                Field::new("Team ID", Integer),
                Field::new("Value", Integer),
            ],
            FormKind::TrackStatistic => vec![
                Field::new("League ID", Integer),
                Field::new("Stat ID", Integer),
                Field::new("Description", Text),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl Field {
    fn new(label: &'static str, kind: FieldKind) -> Self {
        Self {
            label,
            value: String::new(),
            kind,
        }
    }

    fn integer(&self) -> Result<i64, FormError> {
        let raw = self.value.trim();
        if raw.is_empty() {
            return Err(FormError::Required(self.label));
        }
        raw.parse::<i64>()
            .map_err(|_| FormError::NotANumber(self.label))
    }

    fn text(&self) -> Result<String, FormError> {
        let raw = self.value.trim();
        if raw.is_empty() {
            return Err(FormError::Required(self.label));
        }
        Ok(raw.to_string())
    }

    fn optional(&self) -> Option<String> {
        let raw = self.value.trim();
        (!raw.is_empty()).then(|| raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a whole number")]
    NotANumber(&'static str),
    #[error("Name or Country is required")]
    NothingToUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focused: usize,
}

impl Form {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            fields: kind.fields(),
            focused: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.kind);
    }

    /// Switches to the tab's next mode, keeping the league id already typed.
    /// Single-mode forms are left as they are.
    pub fn cycle_mode(&mut self) {
        if self.kind.next_mode() == self.kind {
            return;
        }
        let league_id = self.value("League ID").map(str::to_string);
        *self = Self::new(self.kind.next_mode());
        if let Some(league_id) = league_id {
            self.set_value("League ID", league_id);
        }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    pub fn set_value(&mut self, label: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.label == label) {
            field.value = value.into();
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn push_char(&mut self, ch: char) {
        let Some(field) = self.fields.get_mut(self.focused) else {
            return;
        };
        if field.kind == FieldKind::Integer && !(ch.is_ascii_digit() || ch == '-') {
            return;
        }
        field.value.push(ch);
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    /// Coerces the fields into the request this form submits.
    pub fn submit(&self) -> Result<ApiCommand, FormError> {
        let fields = &self.fields;
        let command = match self.kind {
            FormKind::CreateLeague => ApiCommand::CreateLeague(NewLeague {
                league_id: fields[0].integer()?,
                name: fields[1].text()?,
                country: fields[2].text()?,
            }),
            FormKind::UpdateLeague => {
                let league_id = fields[0].integer()?;
                let update = LeagueUpdate {
                    name: fields[1].optional(),
                    country: fields[2].optional(),
                };
                if update.name.is_none() && update.country.is_none() {
                    return Err(FormError::NothingToUpdate);
                }
                ApiCommand::UpdateLeague { league_id, update }
            }
            FormKind::AddTeam => ApiCommand::AddTeam {
                league_id: fields[0].integer()?,
                team: NewTeam {
                    team_id: fields[1].integer()?,
                    team_name: fields[2].text()?,
                    manager: fields[3].text()?,
                },
            },
            FormKind::UpdateStatistic => ApiCommand::UpsertStatistic {
                league_id: fields[0].integer()?,
                update: StatisticUpdate {
                    stat_id: fields[1].integer()?,
                    description: fields[2].text()?,
                    team_id: fields[3].integer()?,
                    value: fields[4].integer()?,
                },
            },
            FormKind::TrackStatistic => ApiCommand::TrackStatistic {
                league_id: fields[0].integer()?,
                stat_id: fields[1].integer()?,
                description: fields[2].text()?,
            },
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::{Form, FormError, FormKind};
    use crate::state::ApiCommand;

    fn filled(kind: FormKind, values: &[&str]) -> Form {
        let mut form = Form::new(kind);
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.value = value.to_string();
        }
        form
    }

    #[test]
    fn integer_fields_ignore_letters_while_typing() {
        let mut form = Form::new(FormKind::CreateLeague);
        for ch in "1a2".chars() {
            form.push_char(ch);
        }
        assert_eq!(form.fields[0].value, "12");
    }

    #[test]
    fn blank_update_fields_are_sent_as_absent() {
        let form = filled(FormKind::UpdateLeague, &["4", "", " Spain "]);
        let Ok(ApiCommand::UpdateLeague { league_id, update }) = form.submit() else {
            panic!("expected update command");
        };
        assert_eq!(league_id, 4);
        assert_eq!(update.name, None);
        assert_eq!(update.country.as_deref(), Some("Spain"));
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let form = filled(FormKind::UpdateStatistic, &["1", "2", "Goals", "3", "-"]);
        assert_eq!(form.submit(), Err(FormError::NotANumber("Value")));
    }

    #[test]
    fn update_without_changes_is_rejected() {
        let form = filled(FormKind::UpdateLeague, &["4", " ", ""]);
        assert_eq!(form.submit(), Err(FormError::NothingToUpdate));
        assert_eq!(
            FormError::NothingToUpdate.to_string(),
            "Name or Country is required"
        );
    }

    #[test]
    fn single_mode_form_keeps_its_values() {
        let mut form = filled(FormKind::AddTeam, &["1", "10", "Northbridge", "A. Stone"]);
        form.cycle_mode();
        assert_eq!(form.kind, FormKind::AddTeam);
        assert_eq!(form.value("Team Name"), Some("Northbridge"));
        assert_eq!(form.value("Manager"), Some("A. Stone"));
    }

    #[test]
    fn cycle_mode_keeps_league_id() {
        let mut form = filled(FormKind::UpdateStatistic, &["7", "2", "Goals"]);
        form.cycle_mode();
        assert_eq!(form.kind, FormKind::TrackStatistic);
        assert_eq!(form.value("League ID"), Some("7"));
        assert_eq!(form.value("Stat ID"), Some(""));
    }
}
