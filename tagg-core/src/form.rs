//! Editing state machine shared by the album and track prompts
//!
//! The form owns no I/O: a driver asks for [`Form::current`], shows the
//! prompt, and feeds the answer back through [`Form::submit`], [`Form::back`]
//! or [`Form::interrupt`].

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};

use crate::album::{AlbumTags, TrackFields};
use crate::tags::{validate, FieldError, TagField};

/// Typed input that moves to the previous field.
pub const COMMAND_BACK: &str = ":b";
/// Typed input that abandons the whole session.
pub const COMMAND_QUIT: &str = ":q";

/// What the driver should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStep {
    Field { field: TagField, default: String },
    Interrupted,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    At(usize),
    Interrupted,
    Finished,
}

#[derive(Debug, Clone)]
struct Slot {
    field: TagField,
    initial: Option<String>,
    accepted: Option<String>,
}

/// Validated values keyed by field.
pub type FormValues = BTreeMap<TagField, String>;

#[derive(Debug, Clone)]
pub struct Form {
    slots: Vec<Slot>,
    position: Position,
}

impl Form {
    pub fn new(fields: Vec<(TagField, Option<String>)>) -> Self {
        let slots: Vec<Slot> = fields
            .into_iter()
            .map(|(field, initial)| Slot {
                field,
                initial,
                accepted: None,
            })
            .collect();
        let position = if slots.is_empty() {
            Position::Finished
        } else {
            Position::At(0)
        };
        Self { slots, position }
    }

    pub fn album(album: &AlbumTags) -> Self {
        Self::new(
            TagField::ALBUM
                .iter()
                .map(|f| (*f, album.get(*f).map(str::to_string)))
                .collect(),
        )
    }

    pub fn track(track: &TrackFields) -> Self {
        Self::new(
            TagField::TRACK
                .iter()
                .map(|f| (*f, track.get(*f).map(str::to_string)))
                .collect(),
        )
    }

    pub fn current(&self) -> FormStep {
        match self.position {
            Position::At(idx) => {
                let slot = &self.slots[idx];
                let default = slot
                    .accepted
                    .clone()
                    .or_else(|| slot.initial.clone())
                    .unwrap_or_default();
                FormStep::Field {
                    field: slot.field,
                    default,
                }
            }
            Position::Interrupted => FormStep::Interrupted,
            Position::Finished => FormStep::Finished,
        }
    }

    /// Validate and store input for the current field, then advance.
    /// On error the form stays where it is.
    pub fn submit(&mut self, raw: &str) -> Result<(), FieldError> {
        let Position::At(idx) = self.position else {
            return Ok(());
        };
        let slot = &mut self.slots[idx];
        slot.accepted = Some(validate(slot.field, raw)?);
        self.position = if idx + 1 < self.slots.len() {
            Position::At(idx + 1)
        } else {
            Position::Finished
        };
        Ok(())
    }

    pub fn back(&mut self) {
        self.position = match self.position {
            Position::At(idx) => Position::At(idx.saturating_sub(1)),
            Position::Finished if !self.slots.is_empty() => Position::At(self.slots.len() - 1),
            Position::Finished => Position::Finished,
            Position::Interrupted if !self.slots.is_empty() => Position::At(0),
            Position::Interrupted => Position::Finished,
        };
    }

    pub fn interrupt(&mut self) {
        self.position = Position::Interrupted;
    }

    pub fn into_values(self) -> Result<FormValues> {
        if self.position != Position::Finished {
            return Err(anyhow!("form is not finished"));
        }
        self.slots
            .into_iter()
            .map(|slot| {
                slot.accepted
                    .map(|value| (slot.field, value))
                    .ok_or_else(|| anyhow!("{} is required", slot.field))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(form: &Form) -> TagField {
        match form.current() {
            FormStep::Field { field, .. } => field,
            other => panic!("expected a field, got {other:?}"),
        }
    }

    #[test]
    fn walks_fields_in_order_with_defaults() {
        let album = AlbumTags {
            artist: Some("Slint".into()),
            ..AlbumTags::default()
        };
        let mut form = Form::album(&album);

        assert_eq!(
            form.current(),
            FormStep::Field {
                field: TagField::Artist,
                default: "Slint".into()
            }
        );
        form.submit("Slint").unwrap();
        assert_eq!(
            form.current(),
            FormStep::Field {
                field: TagField::AlbumArtist,
                default: String::new()
            }
        );
    }

    #[test]
    fn invalid_input_keeps_position() {
        let mut form = Form::track(&TrackFields::default());
        let err = form.submit("one").unwrap_err();
        assert_eq!(
            err,
            FieldError::NotNumeric {
                field: TagField::TrackNumber
            }
        );
        assert_eq!(field_of(&form), TagField::TrackNumber);
    }

    #[test]
    fn back_revisits_previous_answer() {
        let mut form = Form::track(&TrackFields::default());
        form.back();
        assert_eq!(field_of(&form), TagField::TrackNumber);

        form.submit("4").unwrap();
        form.submit("1").unwrap();
        form.back();
        assert_eq!(
            form.current(),
            FormStep::Field {
                field: TagField::DiscNumber,
                default: "1".into()
            }
        );

        form.submit("2").unwrap();
        form.submit("Spiderland").unwrap();
        assert_eq!(form.current(), FormStep::Finished);
        form.back();
        assert_eq!(field_of(&form), TagField::Title);
    }

    #[test]
    fn interrupt_stops_and_back_restarts() {
        let mut form = Form::track(&TrackFields::default());
        form.submit("1").unwrap();
        form.interrupt();
        assert_eq!(form.current(), FormStep::Interrupted);
        assert!(form.clone().into_values().is_err());

        form.back();
        assert_eq!(field_of(&form), TagField::TrackNumber);
    }

    #[test]
    fn finished_form_yields_values() {
        let mut form = Form::track(&TrackFields::default());
        for answer in ["3", "1", " Nosferatu Man "] {
            form.submit(answer).unwrap();
        }
        let values = form.into_values().unwrap();
        assert_eq!(values[&TagField::TrackNumber], "3");
        assert_eq!(values[&TagField::Title], "Nosferatu Man");
    }
}
