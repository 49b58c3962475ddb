use std::sync::Arc;

use crate::{
    Config, FlowEngine, Result, WeatherConfig,
    flow::{
        FlowGraph, Handler, HandlerRegistry, NodeId,
        handlers::{WeatherLookupAction, weather::WEATHER_HANDLER},
    },
    model::FlowModel,
};

/// Assembles a [`FlowEngine`] from a flow definition and its handlers.
#[derive(Default)]
pub struct EngineBuilder {
    flow: Option<FlowModel>,
    initial_node: Option<NodeId>,
    registry: HandlerRegistry,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for the configured flow with the weather lookup registered.
    pub fn from_config(config: &Config) -> Result<Self> {
        let flow = match &config.flow {
            Some(path) => FlowModel::from_file(path)?,
            None => FlowModel::weather()?,
        };
        Ok(Self::new().flow(flow).weather(config.weather.clone()))
    }

    /// Flow to run; the built-in weather flow when unset.
    pub fn flow(
        mut self,
        flow: FlowModel,
    ) -> Self {
        self.flow = Some(flow);
        self
    }

    /// Start somewhere other than the flow's `initial_node`.
    pub fn initial_node(
        mut self,
        id: impl Into<NodeId>,
    ) -> Self {
        self.initial_node = Some(id.into());
        self
    }

    pub fn handler(
        mut self,
        name: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Self {
        self.registry.register(name, handler);
        self
    }

    /// Register the weather lookup as `get_weather`.
    pub fn weather(
        self,
        config: WeatherConfig,
    ) -> Self {
        self.handler(WEATHER_HANDLER, Arc::new(WeatherLookupAction::new(config)))
    }

    pub fn build_graph(&self) -> Result<Arc<FlowGraph>> {
        let graph = match &self.flow {
            Some(flow) => FlowGraph::build(flow, &self.registry)?,
            None => FlowGraph::build(&FlowModel::weather()?, &self.registry)?,
        };
        Ok(Arc::new(graph))
    }

    pub fn build(&self) -> Result<FlowEngine> {
        let graph = self.build_graph()?;
        match &self.initial_node {
            Some(id) => FlowEngine::initialize(graph, id),
            None => Ok(FlowEngine::new(graph)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{FlowError, common::testing::StubHttpClient};

    fn stub_lookup() -> Arc<WeatherLookupAction> {
        Arc::new(WeatherLookupAction::with_client(WeatherConfig::default(), Arc::new(StubHttpClient::respond(404, ""))))
    }

    #[test]
    fn test_build_default_flow() {
        let engine = EngineBuilder::new().handler(WEATHER_HANDLER, stub_lookup()).build().unwrap();
        assert_eq!(engine.current_node(), "greeting");
    }

    #[test]
    fn test_build_with_initial_node() {
        let engine = EngineBuilder::new().handler(WEATHER_HANDLER, stub_lookup()).initial_node("conversation").build().unwrap();
        assert_eq!(engine.current_node(), "conversation");

        let err = EngineBuilder::new().handler(WEATHER_HANDLER, stub_lookup()).initial_node("missing").build().err().unwrap();
        assert!(matches!(err, FlowError::Config(_)));
    }

    #[test]
    fn test_build_without_handler_fails() {
        let err = EngineBuilder::new().build().err().unwrap();
        assert!(err.to_string().contains("get_weather"));
    }

    #[test]
    fn test_from_config() {
        let engine = EngineBuilder::from_config(&Config::default()).unwrap().build().unwrap();
        assert_eq!(engine.current_node(), "greeting");
    }

    #[test]
    fn test_from_config_missing_flow_file() {
        let config = Config {
            flow: Some(PathBuf::from("/nonexistent/flow.json")),
            ..Config::default()
        };
        let err = EngineBuilder::from_config(&config).err().unwrap();
        assert!(matches!(err, FlowError::Config(_)));
    }

    #[test]
    fn test_weather_flow_matches_lookup_schema() {
        let flow = FlowModel::weather().unwrap();
        for node in flow.nodes.values() {
            for function in node.functions.iter().filter(|f| f.function.handler.as_deref() == Some(WEATHER_HANDLER)) {
                assert_eq!(function.function.parameters, WeatherLookupAction::schema());
            }
        }
    }
}
