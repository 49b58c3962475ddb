//! # weatherflow
//!
//! weatherflow drives a voice bot's conversation as a declarative state
//! machine. Nodes carry prompts and the actions an LLM may call; actions run
//! handlers (such as the weather lookup) and move the conversation between
//! nodes until it reaches `end`.
//!
//! Audio transport, speech recognition/synthesis and the LLM itself stay
//! outside: the pipeline feeds each turn in as free text or a structured
//! function call and renders the `{node, content}` that comes back.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use weatherflow::{EngineBuilder, FlowInput, WeatherConfig};
//!
//! let mut engine = EngineBuilder::new().weather(WeatherConfig::from_env()).build()?;
//!
//! let out = engine.process(FlowInput::call("get_weather", json!({"city": "Paris"}))).await?;
//! let out = engine.process(FlowInput::call("end_conversation", json!({}))).await?;
//! assert_eq!(out.node, "end");
//! ```

mod builder;
mod common;
mod config;
mod engine;
mod error;
pub mod flow;
pub mod model;
pub mod runtime;
mod utils;

pub use builder::EngineBuilder;
pub use common::{HttpClient, HttpResponse, ReqwestClient, Vars};
pub use config::{Config, WeatherConfig};
pub use engine::{ActionCall, Content, FlowEngine, FlowInput, FlowOutput};
pub use error::FlowError;
pub use flow::handlers::{WeatherLookupAction, WeatherResult};

/// Result type alias for weatherflow operations.
pub type Result<T> = std::result::Result<T, FlowError>;
