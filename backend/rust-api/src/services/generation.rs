use serde::de::DeserializeOwned;

use crate::{
    error::{CompletionError, ProxyError},
    metrics,
    models::{
        completion::{PromptPair, ToolSpec},
        Artifact,
    },
    services::completion_client::CompletionClient,
};

/// Shared pipeline of both proxies: one forced tool call, then decode the
/// first tool invocation's arguments into `T`.
pub(crate) async fn generate_structured<T>(
    client: &CompletionClient,
    artifact: Artifact,
    prompts: PromptPair,
    tool: &ToolSpec,
) -> Result<T, ProxyError>
where
    T: DeserializeOwned,
{
    let response = match metrics::track_completion(artifact, client.call_tool(prompts, tool)).await
    {
        Ok(response) => response,
        // The gateway answered 2xx, so this is a generation failure
        Err(CompletionError::MalformedBody(e)) => {
            tracing::warn!(%artifact, "Completion API returned a non-JSON body: {}", e);
            return Err(ProxyError::MissingResult { artifact });
        }
        Err(source) => return Err(ProxyError::Upstream { artifact, source }),
    };

    let call = response
        .first_function_call()
        .ok_or(ProxyError::MissingResult { artifact })?;

    if call.name != tool.name {
        tracing::warn!(
            expected = tool.name,
            actual = %call.name,
            "Completion API answered with a different tool name"
        );
    }

    let arguments = call.arguments_json().map_err(|e| {
        ProxyError::invalid_result(artifact, format!("tool arguments are not JSON: {}", e))
    })?;

    serde_json::from_value(arguments).map_err(|e| {
        ProxyError::invalid_result(
            artifact,
            format!("tool arguments do not match schema: {}", e),
        )
    })
}
