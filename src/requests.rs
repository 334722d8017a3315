use reqwest::Method;
use typed_builder::TypedBuilder;
use url::{form_urlencoded, Url};

use crate::datetime::ApiTime;
use crate::params::Parameters;

/// Renders a call the way it travels: query string for GET, form body otherwise.
///
/// Callers pass parameters that already have secrets masked, see
/// [`Parameters::redacted`].
pub fn describe_call(method: &Method, url: &Url, params: &Parameters) -> String {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.to_wire())
        .finish();
    let mut target = url.clone();
    target.set_query(None);

    if *method == Method::GET {
        if encoded.is_empty() {
            format!("{} {}", method, target)
        } else {
            format!("{} {}?{}", method, target, encoded)
        }
    } else {
        format!("{} {}\n\n{}", method, target, encoded)
    }
}

/// Trait for converting a typed action into request parameters.
pub trait ToParameters {
    /// Converts the action to `Parameters`.
    fn to_parameters(&self) -> Parameters;
}

/// Clocks a user in on a line, optionally as a past session.
#[derive(TypedBuilder, Debug, Clone)]
pub struct ClockIn {
    /// Code of the line to clock in on.
    #[builder(setter(into))]
    pub linecode: String,
    /// Session start; the server uses the current time when absent.
    #[builder(default, setter(strip_option))]
    pub start: Option<ApiTime>,
    /// Session end, for recording a finished session.
    #[builder(default, setter(strip_option))]
    pub end: Option<ApiTime>,
}

impl ToParameters for ClockIn {
    fn to_parameters(&self) -> Parameters {
        Parameters::new()
            .param("linecode", &self.linecode)
            .param_opt("start", self.start)
            .param_opt("end", self.end)
    }
}

/// Sets a machine's cycle count.
#[derive(Debug, Clone)]
pub struct SetCycleCount {
    /// Machine code.
    pub code: String,
    /// New cycle count.
    pub cyclecount: i64,
}

impl ToParameters for SetCycleCount {
    fn to_parameters(&self) -> Parameters {
        Parameters::new()
            .param("code", &self.code)
            .param("cyclecount", self.cyclecount)
    }
}

/// Adds to a machine's cycle count.
#[derive(Debug, Clone)]
pub struct IncrementCycleCount {
    /// Machine code.
    pub code: String,
    /// Cycles to add.
    pub cyclecount: i64,
    /// Leave the machine's last-updated timestamp alone, for high frequency updates.
    pub skip_lastupdated: bool,
}

impl ToParameters for IncrementCycleCount {
    fn to_parameters(&self) -> Parameters {
        let params = Parameters::new()
            .param("code", &self.code)
            .param("cyclecount", self.cyclecount);
        if self.skip_lastupdated {
            params.param("skip_lastupdated", 1)
        } else {
            params
        }
    }
}

/// Opens a dispatch on a machine.
#[derive(Debug, Clone)]
pub struct OpenDispatch {
    /// Dispatch type id.
    pub dispatchtype: i64,
    /// Free text description.
    pub description: String,
    /// Machine id.
    pub machine: i64,
}

impl ToParameters for OpenDispatch {
    fn to_parameters(&self) -> Parameters {
        Parameters::new()
            .param("dispatchtype", self.dispatchtype)
            .param("description", &self.description)
            .param("machine", self.machine)
    }
}

/// Records a dispatch that already happened.
#[derive(TypedBuilder, Debug, Clone)]
pub struct AddDispatch {
    /// Dispatch type code.
    #[builder(setter(into))]
    pub dispatchtypecode: String,
    /// Free text description.
    #[builder(setter(into))]
    pub description: String,
    /// Machine code.
    #[builder(setter(into))]
    pub machinecode: String,
    /// When the event was reported.
    pub reported: ApiTime,
    /// When the event was resolved.
    pub completed: ApiTime,
}

impl ToParameters for AddDispatch {
    fn to_parameters(&self) -> Parameters {
        Parameters::new()
            .param("dispatchtypecode", &self.dispatchtypecode)
            .param("description", &self.description)
            .param("machinecode", &self.machinecode)
            .param("reported", self.reported)
            .param("completed", self.completed)
    }
}

/// Production data for one pitch on a line.
#[derive(TypedBuilder, Debug, Clone)]
pub struct RecordDetails {
    /// Line code.
    #[builder(setter(into))]
    pub linecode: String,
    /// Product code; unknown codes create a new product.
    #[builder(setter(into))]
    pub productcode: String,
    /// Good parts produced.
    pub actual: i64,
    /// Scrapped parts.
    #[builder(default)]
    pub scrap: i64,
    /// Operators working the line.
    #[builder(default)]
    pub operator_count: i64,
    /// Pitch start.
    #[builder(default = ApiTime::Now)]
    pub start: ApiTime,
    /// Pitch end.
    #[builder(default = ApiTime::Now)]
    pub end: ApiTime,
}

impl ToParameters for RecordDetails {
    fn to_parameters(&self) -> Parameters {
        Parameters::new()
            .param("linecode", &self.linecode)
            .param("productcode", &self.productcode)
            .param("actual", self.actual)
            .param("scrap", self.scrap)
            .param("operator_count", self.operator_count)
            .param("start", self.start)
            .param("end", self.end)
    }
}

/// Query for the daily production summary of a line.
#[derive(Debug, Clone)]
pub struct DailySummaryQuery {
    /// Range start.
    pub start: ApiTime,
    /// Range end.
    pub end: ApiTime,
    /// Line code.
    pub linecode: String,
    /// Break the summary down by product.
    pub show_products: bool,
}

impl ToParameters for DailySummaryQuery {
    fn to_parameters(&self) -> Parameters {
        Parameters::new()
            .param("start", self.start)
            .param("end", self.end)
            .param("linecode", &self.linecode)
            .param("show_products", self.show_products)
    }
}
