// Data models matching the ticket form the assistant fills in

pub mod assistant;
pub mod catalog;

pub use assistant::{
    AssistantData, AssistantDataFromAi, AssistantRequest, AssistantResponse, Category,
    PLACEHOLDER_CONFIDENCE,
};
pub use catalog::{Product, User};
