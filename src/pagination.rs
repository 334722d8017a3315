use std::marker::PhantomData;

use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;

use crate::client::states::Scope;
use crate::client::DispatchClient;
use crate::params::Parameters;
use crate::{DispatchError, DispatchResult};

/// Offset based pagination cursor.
///
/// A page holding exactly `limit` items means more may follow, so the offset moves past
/// it. A shorter page is the last one. The remote collection has to stay stable while
/// paging, otherwise items can be skipped or seen twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetCursor {
    /// The maximum amount of items per page.
    pub limit: u32,
    /// Index of the first item of the next page.
    pub offset: u32,
    finished: bool,
}

impl Default for OffsetCursor {
    fn default() -> Self {
        Self::new(100)
    }
}

impl OffsetCursor {
    /// Creates a new cursor at offset 0. A `limit` of 0 is raised to 1.
    pub fn new(limit: u32) -> OffsetCursor {
        OffsetCursor {
            limit: limit.max(1),
            offset: 0,
            finished: false,
        }
    }

    /// Returns whether the last page has been seen.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// The `limit` and `offset` parameters of the next page.
    pub fn page_params(&self) -> Parameters {
        Parameters::new()
            .param("limit", self.limit)
            .param("offset", self.offset)
    }

    /// Records a received page of `received` items.
    pub fn advance(&mut self, received: usize) {
        if received < self.limit as usize {
            self.finished = true;
        } else {
            self.offset = self.offset.saturating_add(received as u32);
        }
    }
}

/// Pages through a list endpoint of a [`DispatchClient`].
pub struct Paginated<'a, T, State> {
    client: &'a DispatchClient<State>,
    path: String,
    base_params: Parameters,
    cursor: OffsetCursor,
    pages: usize,
    _phantom: PhantomData<T>,
}

impl<'a, T, State> Paginated<'a, T, State>
where
    T: DeserializeOwned,
    State: Scope,
{
    /// Create a new paginated listing.
    pub(crate) fn new(
        client: &'a DispatchClient<State>,
        path: &str,
        base_params: Parameters,
        limit: u32,
    ) -> Self {
        Self {
            client,
            path: path.to_string(),
            base_params,
            cursor: OffsetCursor::new(limit),
            pages: 0,
            _phantom: PhantomData,
        }
    }

    /// Fetch the next page of results.
    ///
    /// Returns None when there are no more pages available.
    pub async fn next(&mut self) -> DispatchResult<Option<Vec<T>>> {
        if self.cursor.finished() {
            return Ok(None);
        }

        let params = self.base_params.merged(&self.cursor.page_params());
        let page: Vec<T> = self.client.get_data(&self.path, &params).await?;
        self.pages += 1;
        self.cursor.advance(page.len());
        tracing::debug!(
            path = %self.path,
            offset = self.cursor.offset,
            received = page.len(),
            "fetched page"
        );

        if page.is_empty() {
            return Ok(None);
        }
        Ok(Some(page))
    }

    /// Collect all remaining pages into a single Vec.
    pub async fn collect_all(&mut self) -> DispatchResult<Vec<T>> {
        let mut all_items = Vec::new();
        while let Some(batch) = self.next().await? {
            all_items.extend(batch);
        }
        Ok(all_items)
    }

    /// Walks all remaining pages and returns the very last item.
    pub async fn last_item(&mut self) -> DispatchResult<Option<T>> {
        let mut last = None;
        while let Some(batch) = self.next().await? {
            if let Some(item) = batch.into_iter().last() {
                last = Some(item);
            }
        }
        Ok(last)
    }

    /// Number of requests made so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Check if all pages have been fetched.
    pub fn is_finished(&self) -> bool {
        self.cursor.finished()
    }

    /// Turns the listing into a stream of single items.
    pub fn into_stream(self) -> impl Stream<Item = DispatchResult<T>> + 'a
    where
        T: 'a,
    {
        stream::try_unfold(self, |mut pages| async move {
            Ok::<_, DispatchError>(pages.next().await?.map(|page| (page, pages)))
        })
        .map_ok(|page| stream::iter(page.into_iter().map(Ok::<T, DispatchError>)))
        .try_flatten()
    }
}
