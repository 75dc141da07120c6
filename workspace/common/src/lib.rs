//! Common transport-layer types shared between the backend and any frontend.
//! These structs mirror the backend handlers' response payloads so a client
//! can deserialize API responses without duplicating shapes.

mod aggregates;
mod bundle;
mod forecast;

pub use aggregates::{
    AgeGroupTotalDto, AggregateSeriesDto, BirthRecordDto, HeatmapRowDto, MonthOfYearMeanDto,
    RegionTotalDto, SeriesPointDto, SummaryDto, YearTotalDto,
};
pub use bundle::PrecomputedBundle;
pub use forecast::{ForecastDto, ForecastPointDto};
