// Model exports
pub mod domain;
pub mod message;

pub use domain::{
    BudgetBand, CampusProximity, HousingType, LivingEnvironment, PreferenceRecord, Property,
    Roommate, ScoredProperty, DISPLAY_REASON_LIMIT,
};
pub use message::{Author, Message};
