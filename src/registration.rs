//! Registration conversation: photo, name, date of birth, height, bio, location.
//!
//! Each step is a pure function of the current state and the incoming event.
//! Invalid input leaves the state and its draft untouched and answers with a
//! corrective message. Persisting the finished profile is left to the caller.

use chrono::{Datelike, NaiveDate};
use log::{debug, info};

use crate::{
    command::Command,
    error::ValidationError,
    models::{callback::CallbackData, event::Event, profile::Location},
    reply::{Button, Reply},
    state::{Draft, State},
};

pub const MAX_PHOTOS: usize = 3;
pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 99;
pub const MIN_HEIGHT_CM: i64 = 100;
pub const MAX_HEIGHT_CM: i64 = 250;
pub const MAX_BIO_CHARS: usize = 500;

const BIRTH_DATE_FORMAT: &str = "%d-%m-%Y";

pub const PHOTO_PROMPT: &str = "(A) Profile photo\nSend your first photo.";
pub const NEXT_PHOTO_PROMPT: &str = "Send your next photo.";
pub const NAME_PROMPT: &str = "(B) Name\nEnter your name.";
pub const BIRTH_DATE_PROMPT: &str =
    "(C) Date of birth\nUse the DD-MM-YYYY format (e.g. 31-12-1995).";
pub const LOCATION_PROMPT: &str = "(F) Location\nLast step: send your location.";
pub const CANCELLED: &str = "Profile creation cancelled.";

/// Where the conversation goes after one step.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Continue(State),
    /// Every field is collected; the draft now holds the location too.
    Completed(Draft),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub outcome: Outcome,
    pub replies: Vec<Reply>,
}

impl Step {
    fn to(state: State, replies: Vec<Reply>) -> Self {
        Step {
            outcome: Outcome::Continue(state),
            replies,
        }
    }

    fn retry(state: State, reply: Reply) -> Self {
        Step::to(state, vec![reply])
    }
}

/// Entry point, triggered by the "create profile" button.
pub fn begin() -> Step {
    Step::to(
        State::ReceivePhoto {
            draft: Draft::default(),
        },
        vec![Reply::Edit {
            text: PHOTO_PROMPT.to_string(),
            buttons: Vec::new(),
        }],
    )
}

pub fn advance(state: State, event: Event, today: NaiveDate) -> Step {
    if event == Event::Command(Command::Cancel) {
        info!("registration cancelled");
        return Step {
            outcome: Outcome::Cancelled,
            replies: vec![Reply::RemoveKeyboard(CANCELLED.to_string())],
        };
    }

    match state {
        State::Start => Step::to(State::Start, Vec::new()),
        State::ReceivePhoto { draft } => receive_photo(draft, event),
        State::AskMorePhotos { draft } => ask_more_photos(draft, event),
        State::ReceiveName { draft } => receive_name(draft, event),
        State::ReceiveBirthDate { draft } => receive_birth_date(draft, event, today),
        State::ReceiveHeight { draft } => receive_height(draft, event),
        State::ReceiveBio { draft } => receive_bio(draft, event),
        State::ReceiveLocation { draft } => receive_location(draft, event),
    }
}

fn receive_photo(mut draft: Draft, event: Event) -> Step {
    let file_id = match event {
        Event::Media { file_id } => file_id,
        Event::Text(_) | Event::Command(_) => {
            return Step::retry(
                State::ReceivePhoto { draft },
                Reply::text("Right now I'm waiting for a PHOTO. Send a photo file."),
            )
        }
        _ => {
            return Step::retry(
                State::ReceivePhoto { draft },
                Reply::text("Please send a photo file."),
            )
        }
    };

    debug!(
        "photo received: {}...",
        file_id.chars().take(10).collect::<String>()
    );
    draft.photos.push(file_id);

    if draft.photos.len() >= MAX_PHOTOS {
        return Step::to(
            State::ReceiveName { draft },
            vec![
                Reply::text("Photos complete (3 photos). Moving on to the next step."),
                Reply::text(NAME_PROMPT),
            ],
        );
    }

    Step::to(
        State::AskMorePhotos { draft },
        vec![Reply::Buttons {
            text: "Photo received. Add another one?".to_string(),
            buttons: more_photos_buttons(),
        }],
    )
}

fn more_photos_buttons() -> Vec<Vec<Button>> {
    vec![vec![
        Button::new("Add more", CallbackData::AddPhoto),
        Button::new("Continue", CallbackData::SkipPhoto),
    ]]
}

fn ask_more_photos(draft: Draft, event: Event) -> Step {
    match event {
        Event::Callback(CallbackData::AddPhoto) => Step::to(
            State::ReceivePhoto { draft },
            vec![Reply::Edit {
                text: NEXT_PHOTO_PROMPT.to_string(),
                buttons: Vec::new(),
            }],
        ),
        Event::Callback(CallbackData::SkipPhoto) => Step::to(
            State::ReceiveName { draft },
            vec![Reply::Edit {
                text: NAME_PROMPT.to_string(),
                buttons: Vec::new(),
            }],
        ),
        _ => Step::retry(
            State::AskMorePhotos { draft },
            Reply::Buttons {
                text: "Add another photo or continue?".to_string(),
                buttons: more_photos_buttons(),
            },
        ),
    }
}

fn receive_name(mut draft: Draft, event: Event) -> Step {
    match event {
        Event::Text(name) if !name.trim().is_empty() => {
            draft.name = Some(name);
            Step::to(
                State::ReceiveBirthDate { draft },
                vec![Reply::text(BIRTH_DATE_PROMPT)],
            )
        }
        _ => Step::retry(
            State::ReceiveName { draft },
            Reply::text("Send your name as text."),
        ),
    }
}

fn receive_birth_date(mut draft: Draft, event: Event, today: NaiveDate) -> Step {
    let Event::Text(text) = event else {
        return Step::retry(
            State::ReceiveBirthDate { draft },
            Reply::text(ValidationError::DateFormat.to_string()),
        );
    };

    match parse_birth_date(&text, today) {
        Ok((date_of_birth, age)) => {
            draft.date_of_birth = Some(date_of_birth);
            draft.age = Some(age);
            Step::to(
                State::ReceiveHeight { draft },
                vec![Reply::text(format!(
                    "You are {age} years old.\n\n(D) Height\nEnter your height in cm (e.g. 175)."
                ))],
            )
        }
        Err(err) => {
            debug!("rejected date of birth {text:?}: {err:?}");
            Step::retry(
                State::ReceiveBirthDate { draft },
                Reply::text(err.to_string()),
            )
        }
    }
}

fn receive_height(mut draft: Draft, event: Event) -> Step {
    let Event::Text(text) = event else {
        return Step::retry(
            State::ReceiveHeight { draft },
            Reply::text(ValidationError::HeightNotANumber.to_string()),
        );
    };

    match parse_height(&text) {
        Ok(height_cm) => {
            draft.height_cm = Some(height_cm);
            Step::to(
                State::ReceiveBio { draft },
                vec![Reply::text(
                    "(E) Bio\nWrite a short description about yourself.",
                )],
            )
        }
        Err(err) => Step::retry(State::ReceiveHeight { draft }, Reply::text(err.to_string())),
    }
}

fn receive_bio(mut draft: Draft, event: Event) -> Step {
    let Event::Text(bio) = event else {
        return Step::retry(
            State::ReceiveBio { draft },
            Reply::text("Send your bio as text."),
        );
    };

    match check_bio(&bio) {
        Ok(()) => {
            draft.bio = Some(bio);
            Step::to(
                State::ReceiveLocation { draft },
                vec![Reply::RequestLocation(LOCATION_PROMPT.to_string())],
            )
        }
        Err(err) => Step::retry(State::ReceiveBio { draft }, Reply::text(err.to_string())),
    }
}

fn receive_location(mut draft: Draft, event: Event) -> Step {
    match event {
        Event::Location {
            latitude,
            longitude,
        } => {
            draft.location = Some(Location {
                latitude,
                longitude,
            });
            Step {
                outcome: Outcome::Completed(draft),
                replies: Vec::new(),
            }
        }
        _ => Step::retry(
            State::ReceiveLocation { draft },
            Reply::RequestLocation("Please use the 'Send location' button.".to_string()),
        ),
    }
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

pub fn parse_birth_date(text: &str, today: NaiveDate) -> Result<(NaiveDate, u8), ValidationError> {
    let birth = NaiveDate::parse_from_str(text.trim(), BIRTH_DATE_FORMAT)
        .map_err(|_| ValidationError::DateFormat)?;
    let age = age_on(birth, today);

    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }

    let age = u8::try_from(age).map_err(|_| ValidationError::AgeOutOfRange(age))?;
    Ok((birth, age))
}

pub fn parse_height(text: &str) -> Result<u16, ValidationError> {
    let height: i64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::HeightNotANumber)?;

    if !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&height) {
        return Err(ValidationError::HeightOutOfRange(height));
    }

    u16::try_from(height).map_err(|_| ValidationError::HeightOutOfRange(height))
}

pub fn check_bio(bio: &str) -> Result<(), ValidationError> {
    let chars = bio.chars().count();
    if chars > MAX_BIO_CHARS {
        return Err(ValidationError::BioTooLong(chars));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn photo(id: &str) -> Event {
        Event::Media {
            file_id: id.to_string(),
        }
    }

    fn text(s: &str) -> Event {
        Event::Text(s.to_string())
    }

    fn next_state(step: Step) -> State {
        match step.outcome {
            Outcome::Continue(state) => state,
            other => panic!("expected the conversation to continue, got {other:?}"),
        }
    }

    fn draft_until_bio() -> Draft {
        Draft {
            photos: vec!["p1".into()],
            name: Some("Alex".into()),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1),
            age: Some(26),
            height_cm: Some(175),
            ..Draft::default()
        }
    }

    #[test]
    fn age_counts_whole_years() {
        let birth = NaiveDate::from_ymd_opt(2000, 10, 18).unwrap();
        assert_eq!(age_on(birth, today()), 25);
        let birth = NaiveDate::from_ymd_opt(2000, 10, 17).unwrap();
        assert_eq!(age_on(birth, today()), 26);
    }

    #[test]
    fn birth_date_bounds() {
        assert_eq!(parse_birth_date("17-10-2008", today()).unwrap().1, 18);
        assert_eq!(
            parse_birth_date("18-10-2008", today()),
            Err(ValidationError::AgeOutOfRange(17))
        );
        assert_eq!(parse_birth_date("17-10-1927", today()).unwrap().1, 99);
        assert_eq!(
            parse_birth_date("17-10-1926", today()),
            Err(ValidationError::AgeOutOfRange(100))
        );
        assert_eq!(
            parse_birth_date("01-01-2030", today()),
            Err(ValidationError::AgeOutOfRange(-4))
        );
    }

    #[test]
    fn birth_date_format_is_strict() {
        for input in ["2000-01-01", "31/12/1995", "31-02-1995", "yesterday", ""] {
            assert_eq!(
                parse_birth_date(input, today()),
                Err(ValidationError::DateFormat),
                "{input}"
            );
        }
        assert!(parse_birth_date(" 31-12-1995 ", today()).is_ok());
    }

    #[test]
    fn height_bounds() {
        assert_eq!(parse_height("100"), Ok(100));
        assert_eq!(parse_height(" 250 "), Ok(250));
        assert_eq!(parse_height("99"), Err(ValidationError::HeightOutOfRange(99)));
        assert_eq!(parse_height("251"), Err(ValidationError::HeightOutOfRange(251)));
        assert_eq!(parse_height("-175"), Err(ValidationError::HeightOutOfRange(-175)));
        assert_eq!(parse_height("175cm"), Err(ValidationError::HeightNotANumber));
        assert_eq!(parse_height("1.75"), Err(ValidationError::HeightNotANumber));
    }

    #[test]
    fn bio_counts_characters() {
        assert!(check_bio(&"a".repeat(500)).is_ok());
        assert!(check_bio(&"é".repeat(500)).is_ok());
        assert_eq!(
            check_bio(&"a".repeat(501)),
            Err(ValidationError::BioTooLong(501))
        );
    }

    #[test]
    fn three_photos_skip_the_prompt() {
        let mut state = next_state(begin());
        state = next_state(advance(state, photo("p1"), today()));
        assert!(matches!(state, State::AskMorePhotos { .. }));
        state = next_state(advance(state, Event::Callback(CallbackData::AddPhoto), today()));
        state = next_state(advance(state, photo("p2"), today()));
        state = next_state(advance(state, Event::Callback(CallbackData::AddPhoto), today()));

        let step = advance(state, photo("p3"), today());
        assert_eq!(step.replies.len(), 2);
        assert_eq!(step.replies[1].body(), NAME_PROMPT);
        match next_state(step) {
            State::ReceiveName { draft } => assert_eq!(draft.photos, ["p1", "p2", "p3"]),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn continue_after_one_photo() {
        let state = next_state(advance(next_state(begin()), photo("p1"), today()));
        let step = advance(state, Event::Callback(CallbackData::SkipPhoto), today());
        assert!(matches!(step.replies[0], Reply::Edit { .. }));
        assert!(matches!(next_state(step), State::ReceiveName { .. }));
    }

    #[test]
    fn photo_step_rejects_other_input() {
        let start = next_state(begin());
        let events = [
            text("hello"),
            Event::Unsupported,
            Event::Location {
                latitude: 1.0,
                longitude: 2.0,
            },
        ];
        for event in events {
            let step = advance(start.clone(), event, today());
            assert_eq!(step.replies.len(), 1);
            assert_eq!(next_state(step), start);
        }
    }

    #[test]
    fn ask_more_photos_waits_for_a_button() {
        let state = next_state(advance(next_state(begin()), photo("p1"), today()));
        let step = advance(state.clone(), text("more please"), today());
        assert_eq!(step.replies[0].buttons().len(), 1);
        assert_eq!(next_state(step), state);
    }

    #[test]
    fn blank_name_is_rejected() {
        let state = State::ReceiveName {
            draft: Draft::default(),
        };
        assert_eq!(next_state(advance(state.clone(), text("   "), today())), state);
        match next_state(advance(state, text(" Alex "), today())) {
            State::ReceiveBirthDate { draft } => assert_eq!(draft.name.as_deref(), Some(" Alex ")),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn rejected_birth_date_keeps_the_draft() {
        let draft = Draft {
            photos: vec!["p1".into()],
            name: Some("Alex".into()),
            ..Draft::default()
        };
        let state = State::ReceiveBirthDate { draft };
        for input in ["18-10-2008", "01-01-1900", "not a date"] {
            let step = advance(state.clone(), text(input), today());
            assert_eq!(next_state(step), state);
        }
        let step = advance(state, text("01-01-2000"), today());
        assert!(step.replies[0].body().starts_with("You are 26 years old."));
        match next_state(step) {
            State::ReceiveHeight { draft } => {
                assert_eq!(draft.age, Some(26));
                assert_eq!(draft.name.as_deref(), Some("Alex"));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn rejected_height_keeps_the_state() {
        let state = State::ReceiveHeight {
            draft: Draft::default(),
        };
        for input in ["99", "251", "tall", "0"] {
            assert_eq!(next_state(advance(state.clone(), text(input), today())), state);
        }
        assert!(matches!(
            next_state(advance(state, text("175"), today())),
            State::ReceiveBio { .. }
        ));
    }

    #[test]
    fn long_bio_keeps_the_state() {
        let state = State::ReceiveBio {
            draft: draft_until_bio(),
        };
        let long = "x".repeat(501);
        assert_eq!(next_state(advance(state.clone(), text(&long), today())), state);

        let step = advance(state, text("Hello"), today());
        assert!(matches!(step.replies[0], Reply::RequestLocation(_)));
        assert!(matches!(next_state(step), State::ReceiveLocation { .. }));
    }

    #[test]
    fn location_completes_registration() {
        let mut draft = draft_until_bio();
        draft.bio = Some("Hello".into());
        let state = State::ReceiveLocation { draft };

        let step = advance(state.clone(), text("Jakarta"), today());
        assert!(matches!(step.replies[0], Reply::RequestLocation(_)));
        assert_eq!(next_state(step), state);

        let step = advance(
            state,
            Event::Location {
                latitude: -6.2,
                longitude: 106.8,
            },
            today(),
        );
        match step.outcome {
            Outcome::Completed(draft) => {
                assert_eq!(
                    draft.location,
                    Some(Location {
                        latitude: -6.2,
                        longitude: 106.8
                    })
                );
                assert_eq!(draft.bio.as_deref(), Some("Hello"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn cancel_from_every_step() {
        let draft = draft_until_bio();
        let states = [
            State::ReceivePhoto { draft: draft.clone() },
            State::AskMorePhotos { draft: draft.clone() },
            State::ReceiveName { draft: draft.clone() },
            State::ReceiveBirthDate { draft: draft.clone() },
            State::ReceiveHeight { draft: draft.clone() },
            State::ReceiveBio { draft: draft.clone() },
            State::ReceiveLocation { draft },
        ];
        for state in states {
            let step = advance(state, Event::Command(Command::Cancel), today());
            assert_eq!(step.outcome, Outcome::Cancelled);
            assert_eq!(step.replies, vec![Reply::RemoveKeyboard(CANCELLED.to_string())]);
        }
    }
}
