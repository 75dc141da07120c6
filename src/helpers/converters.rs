//! Conversions from compute-layer types to transport DTOs.

use common::{
    AgeGroupTotalDto, AggregateSeriesDto, BirthRecordDto, ForecastDto, ForecastPointDto,
    HeatmapRowDto, MonthOfYearMeanDto, RegionTotalDto, SeriesPointDto, SummaryDto, YearTotalDto,
};
use compute::{
    AgeGroupTotal, AggregateSeries, ForecastResult, HeatmapRow, MonthOfYearMean, RegionTotal,
    Summary, YearTotal,
};
use model::{BirthRecord, period::month_name};

pub fn records_to_dtos(records: Vec<BirthRecord>) -> Vec<BirthRecordDto> {
    records
        .into_iter()
        .map(|r| BirthRecordDto {
            region: r.region,
            year: r.period.year,
            month: r.period.month,
            age_group: r.age_group.as_str().to_string(),
            count: r.count,
        })
        .collect()
}

pub fn region_totals_to_dtos(totals: Vec<RegionTotal>) -> Vec<RegionTotalDto> {
    totals
        .into_iter()
        .map(|t| RegionTotalDto {
            region: t.region,
            total: t.total,
        })
        .collect()
}

pub fn age_group_totals_to_dtos(totals: Vec<AgeGroupTotal>) -> Vec<AgeGroupTotalDto> {
    totals
        .into_iter()
        .map(|t| AgeGroupTotalDto {
            age_group: t.age_group.as_str().to_string(),
            total: t.total,
        })
        .collect()
}

pub fn year_totals_to_dtos(totals: Vec<YearTotal>) -> Vec<YearTotalDto> {
    totals
        .into_iter()
        .map(|t| YearTotalDto {
            year: t.year,
            total: t.total,
        })
        .collect()
}

pub fn month_means_to_dtos(means: Vec<MonthOfYearMean>) -> Vec<MonthOfYearMeanDto> {
    means
        .into_iter()
        .map(|m| MonthOfYearMeanDto {
            month: m.month,
            month_name: month_name(m.month).to_string(),
            mean: m.mean,
        })
        .collect()
}

pub fn heatmap_to_dtos(rows: Vec<HeatmapRow>) -> Vec<HeatmapRowDto> {
    rows.into_iter()
        .map(|r| HeatmapRowDto {
            region: r.region,
            means: r.means,
        })
        .collect()
}

pub fn series_to_dto(series: &AggregateSeries) -> AggregateSeriesDto {
    AggregateSeriesDto::new(
        series
            .points()
            .iter()
            .map(|(period, value)| SeriesPointDto {
                year: period.year,
                month: period.month,
                value: *value,
            })
            .collect(),
    )
}

pub fn forecast_to_dto(result: &ForecastResult) -> ForecastDto {
    ForecastDto {
        confidence: result.confidence,
        horizon: result.points.len(),
        points: result
            .points
            .iter()
            .map(|p| ForecastPointDto {
                year: p.period.year,
                month: p.period.month,
                predicted: p.predicted,
                lower: p.lower,
                upper: p.upper,
            })
            .collect(),
    }
}

pub fn summary_to_dto(summary: &Summary) -> SummaryDto {
    SummaryDto {
        total_births: summary.total_births,
        average_births_per_region: summary.average_births_per_region,
        top_region: summary.top_region.clone(),
        dominant_age_group: summary
            .dominant_age_group
            .map(|g| g.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compute::testing::sample_dataset;
    use compute::{FilterSpec, monthly_series};

    #[test]
    fn test_series_dto_keeps_period_order() {
        let dataset = sample_dataset();
        let series = monthly_series(&dataset, &FilterSpec::default()).unwrap();
        let dto = series_to_dto(&series);

        assert_eq!(dto.points.len(), series.len());
        assert_eq!(dto.points[0].year, 2022);
        assert_eq!(dto.points[0].month, 1);
        assert_eq!(dto.points.last().unwrap().year, 2023);
        assert_eq!(dto.points.last().unwrap().month, 12);
    }

    #[test]
    fn test_month_means_carry_names() {
        let means = vec![MonthOfYearMean {
            month: 2,
            mean: 10.0,
        }];
        let dtos = month_means_to_dtos(means);
        assert_eq!(dtos[0].month_name, "February");
    }
}
