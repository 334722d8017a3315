use reqwest::Method;
use serde_json::Value;

use crate::client::states::SiteScoped;
use crate::client::DispatchClient;
use crate::envelope::Extract;
use crate::requests::*;
use crate::resources::Dispatch;
use crate::DispatchResult;

/// Path of the line production summary report.
pub const DAILY_SUMMARY_BY_LINE: &str = "reporting/production/daily_summary_data_by_line/";

impl DispatchClient<SiteScoped> {
    /// Clocks `user` in on a line. With `start` and `end` set this records a past session.
    ///
    /// Returns the whole envelope, the API sends no meaningful payload.
    pub async fn clock_in(&self, user: &str, clock_in: &ClockIn) -> DispatchResult<Value> {
        let url = self.endpoint_segments(["users", "clock_in", user])?;
        self.request(Method::POST, url, &clock_in.to_parameters(), Extract::Envelope)
            .await
    }

    /// Clocks `user` out of a line.
    pub async fn clock_out(&self, user: &str, linecode: &str) -> DispatchResult<Value> {
        let url = self.endpoint_segments(["users", "clock_out", user])?;
        self.request(
            Method::POST,
            url,
            &ClockIn::builder().linecode(linecode).build().to_parameters(),
            Extract::Envelope,
        )
        .await
    }

    /// Sets the cycle count of a machine.
    pub async fn set_cycle_count(&self, action: &SetCycleCount) -> DispatchResult<Value> {
        self.post(
            "machines/set_cycle_count/",
            &action.to_parameters(),
            Extract::Envelope,
        )
        .await
    }

    /// Increments the cycle count of a machine.
    pub async fn increment_cycle_count(
        &self,
        action: &IncrementCycleCount,
    ) -> DispatchResult<Value> {
        self.post(
            "machines/increment_cycle_count/",
            &action.to_parameters(),
            Extract::Envelope,
        )
        .await
    }

    /// Opens a dispatch on a machine.
    pub async fn open_dispatch(&self, action: &OpenDispatch) -> DispatchResult<Dispatch> {
        self.post_data("dispatches/open/", &action.to_parameters())
            .await
    }

    /// Closes an open dispatch.
    pub async fn close_dispatch(&self, id: i64) -> DispatchResult<Dispatch> {
        let id = id.to_string();
        let url = self.endpoint_segments(["dispatches", "close", id.as_str()])?;
        let data = self
            .request(Method::POST, url, &Default::default(), Extract::Data)
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Records a dispatch that already happened.
    ///
    /// The payload is returned untyped, servers do not always echo a dispatch record.
    pub async fn add_dispatch(&self, action: &AddDispatch) -> DispatchResult<Value> {
        self.post("dispatches/add/", &action.to_parameters(), Extract::Data)
            .await
    }

    /// Records production details for a pitch.
    pub async fn record_details(&self, action: &RecordDetails) -> DispatchResult<Value> {
        self.post(
            "pitchdetails/record_details/",
            &action.to_parameters(),
            Extract::Data,
        )
        .await
    }

    /// Fetches the daily production summary of a line.
    pub async fn daily_summary_by_line(&self, query: &DailySummaryQuery) -> DispatchResult<Value> {
        self.get(DAILY_SUMMARY_BY_LINE, &query.to_parameters(), Extract::Data)
            .await
    }
}
