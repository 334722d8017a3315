use serde::de::DeserializeOwned;

use crate::client::states::Scope;
use crate::client::DispatchClient;
use crate::pagination::Paginated;
use crate::params::Parameters;
use crate::DispatchResult;

/// Trait for list resources of the Dispatch API, see [`api_resource!`](crate::api_resource).
#[async_trait::async_trait]
pub trait ApiResource: Sized + DeserializeOwned + Send + 'static {
    /// Path of the list endpoint, relative to the API base URL.
    const PATH: &'static str;

    /// Lists the resource, filtered by `parameters`.
    async fn list<S: Scope>(
        client: &DispatchClient<S>,
        parameters: Parameters,
    ) -> DispatchResult<Vec<Self>> {
        client.get_data(Self::PATH, &parameters).await
    }

    /// Returns the first match of the filter, if any.
    async fn first<S: Scope>(
        client: &DispatchClient<S>,
        parameters: Parameters,
    ) -> DispatchResult<Option<Self>> {
        Ok(Self::list(client, parameters).await?.into_iter().next())
    }

    /// Pages through the resource, `limit` items per request.
    fn paginate<S: Scope>(
        client: &DispatchClient<S>,
        parameters: Parameters,
        limit: u32,
    ) -> Paginated<'_, Self, S> {
        client.paginate(Self::PATH, parameters, limit)
    }
}
