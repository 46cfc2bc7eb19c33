pub mod card_service;
pub mod import_service;
pub mod reference_service;
pub mod validation;

pub use card_service::{CardDetails, CardFilter, CardService, FormChoices, SAMPLE_SIZE};
pub use import_service::{ImportRecord, ImportReport, ImportService, RecordOutcome, ReferenceIndex};
pub use reference_service::ReferenceService;
pub use validation::{
    CardChoices, CardForm, Choice, InvalidCardForm, NewColor, NewEdition, ValidatedCard,
    ValidationService,
};
