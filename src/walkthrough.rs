//! The example walkthrough: one linear pass over the most common API calls.
//!
//! Every step is checked and reported before the next one is issued. The first failure
//! aborts the run.

use chrono::Duration;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::client::states::{SiteScoped, Unscoped};
use crate::client::DispatchClient;
use crate::datetime::{site_now, start_of_day, ApiTime};
use crate::params;
use crate::requests::*;
use crate::resources::{Area, DispatchType, Line, Machine, Site};
use crate::traits::ApiResource;
use crate::{DispatchError, DispatchResult};

/// Page size used when looking for an area; small on purpose so paging is exercised.
pub const AREA_PAGE_SIZE: u32 = 2;

/// Receives the outcome of each walkthrough step.
pub trait Reporter {
    /// Called once per completed step.
    fn step(&mut self, message: &str, payload: &Value);
}

/// Reports steps through `tracing`; payloads are pretty printed in verbose mode.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter {
    /// Print the payload of every step.
    pub verbose: bool,
}

impl Reporter for TracingReporter {
    fn step(&mut self, message: &str, payload: &Value) {
        tracing::info!("{}", message);
        if self.verbose {
            match serde_json::to_string_pretty(payload) {
                Ok(pretty) => tracing::info!("{}", pretty),
                Err(e) => tracing::warn!(error = %e, "could not render payload"),
            }
        }
    }
}

/// Inputs of a walkthrough run.
#[derive(Debug, Clone)]
pub struct WalkthroughOptions {
    /// Id of the test site to operate on.
    pub site: i64,
    /// User name to clock in and out.
    pub user: String,
}

/// The resources a walkthrough picked to operate on.
#[derive(Debug, Clone)]
pub struct Walkthrough {
    /// The validated site.
    pub site: Site,
    /// Last active area.
    pub area: Area,
    /// First active production line of the area.
    pub line: Line,
    /// First active machine of the line.
    pub machine: Machine,
    /// First active dispatch type.
    pub dispatch_type: DispatchType,
}

fn report<R: Reporter, T: Serialize>(
    reporter: &mut R,
    message: &str,
    payload: &T,
) -> DispatchResult<()> {
    reporter.step(message, &serde_json::to_value(payload)?);
    Ok(())
}

/// Runs the whole walkthrough.
pub async fn run<R: Reporter>(
    client: DispatchClient<Unscoped>,
    options: &WalkthroughOptions,
    reporter: &mut R,
) -> DispatchResult<Walkthrough> {
    let (client, site) = client.validate_site(options.site).await?;
    report(reporter, &format!("Using site: {}", site.description), &site)?;

    let picked = discover(&client, site, reporter).await?;
    clock_sessions(&client, &options.user, &picked.line, reporter).await?;
    machine_counts(&client, &picked.machine, reporter).await?;
    dispatches(&client, &picked, reporter).await?;
    production(&client, &picked.line, reporter).await?;

    Ok(picked)
}

async fn discover<R: Reporter>(
    client: &DispatchClient<SiteScoped>,
    site: Site,
    reporter: &mut R,
) -> DispatchResult<Walkthrough> {
    let area = Area::paginate(client, params! { "active" => true }, AREA_PAGE_SIZE)
        .last_item()
        .await?
        .ok_or_else(|| DispatchError::not_found("an active area to use"))?;
    report(reporter, &format!("Using area: {}", area.code), &area)?;

    let line = Line::first(
        client,
        params! {
            "area_id" => area.id,
            "active" => true,
            "enable_production" => true,
        },
    )
    .await?
    .ok_or_else(|| DispatchError::not_found("an active line to use"))?;
    report(reporter, &format!("Using line: {}", line.code), &line)?;

    let machine = Machine::first(
        client,
        params! {
            "line_id" => line.id,
            "active" => true,
        },
    )
    .await?
    .ok_or_else(|| DispatchError::not_found("an active machine to use"))?;
    report(reporter, &format!("Using machine: {}", machine.code), &machine)?;

    let dispatch_type = DispatchType::first(client, params! { "active" => true })
        .await?
        .ok_or_else(|| DispatchError::not_found("an active dispatch type to use"))?;
    report(
        reporter,
        &format!("Using Dispatch Type: {}", dispatch_type.code),
        &dispatch_type,
    )?;

    Ok(Walkthrough {
        site,
        area,
        line,
        machine,
        dispatch_type,
    })
}

async fn clock_sessions<R: Reporter>(
    client: &DispatchClient<SiteScoped>,
    user: &str,
    line: &Line,
    reporter: &mut R,
) -> DispatchResult<()> {
    let envelope = client
        .clock_in(user, &ClockIn::builder().linecode(&line.code).build())
        .await?;
    report(reporter, "User clocked in", &envelope)?;

    let envelope = client.clock_out(user, &line.code).await?;
    report(reporter, "User clocked out", &envelope)?;

    let start = site_now() - Duration::days(7);
    let end = start + Duration::hours(8);
    let envelope = client
        .clock_in(
            user,
            &ClockIn::builder()
                .linecode(&line.code)
                .start(ApiTime::minutes(start))
                .end(ApiTime::minutes(end))
                .build(),
        )
        .await?;
    report(reporter, "Created backdated clock in", &envelope)
}

async fn machine_counts<R: Reporter>(
    client: &DispatchClient<SiteScoped>,
    machine: &Machine,
    reporter: &mut R,
) -> DispatchResult<()> {
    let envelope = client
        .set_cycle_count(&SetCycleCount {
            code: machine.code.clone(),
            cyclecount: 832,
        })
        .await?;
    report(reporter, "Set machine cycle count", &envelope)?;

    let envelope = client
        .increment_cycle_count(&IncrementCycleCount {
            code: machine.code.clone(),
            cyclecount: 5,
            skip_lastupdated: true,
        })
        .await?;
    report(reporter, "Incremented machine cycle count", &envelope)
}

async fn dispatches<R: Reporter>(
    client: &DispatchClient<SiteScoped>,
    picked: &Walkthrough,
    reporter: &mut R,
) -> DispatchResult<()> {
    let opened = client
        .open_dispatch(&OpenDispatch {
            dispatchtype: picked.dispatch_type.id,
            description: "l2lsdk test dispatch".to_string(),
            machine: picked.machine.id,
        })
        .await?;
    report(reporter, "Created open Dispatch", &opened)?;

    let closed = client.close_dispatch(opened.id).await?;
    report(reporter, "Closed open Dispatch", &closed)?;

    let reported = site_now() - Duration::days(60);
    let completed = reported + Duration::minutes(34);
    let added = client
        .add_dispatch(
            &AddDispatch::builder()
                .dispatchtypecode(&picked.dispatch_type.code)
                .description("l2lsdk test dispatch (already closed)")
                .machinecode(&picked.machine.code)
                .reported(ApiTime::seconds(reported))
                .completed(ApiTime::seconds(completed))
                .build(),
        )
        .await?;
    report(reporter, "Created backdated Dispatch", &added)
}

async fn production<R: Reporter>(
    client: &DispatchClient<SiteScoped>,
    line: &Line,
    reporter: &mut R,
) -> DispatchResult<()> {
    // ThreadRng is not Send, keep it out of the await points.
    let (actual, scrap, operator_count) = {
        let mut rng = rand::rng();
        (
            rng.random_range(10..=100),
            rng.random_range(5..=20),
            rng.random_range(0..=10),
        )
    };
    let details = RecordDetails::builder()
        .linecode(&line.code)
        .productcode(format!("testproduct-{}", chrono::Utc::now().timestamp()))
        .actual(actual)
        .scrap(scrap)
        .operator_count(operator_count)
        .start(ApiTime::Now)
        .end(ApiTime::Now)
        .build();
    let data = client.record_details(&details).await?;
    report(reporter, "Recorded Pitch details", &data)?;

    let now = site_now();
    let summary = client
        .daily_summary_by_line(&DailySummaryQuery {
            start: ApiTime::minutes(start_of_day(now)),
            end: ApiTime::minutes(now + Duration::days(1)),
            linecode: line.code.clone(),
            show_products: true,
        })
        .await?;
    report(reporter, "Retrieved Daily summary for line", &summary)
}
