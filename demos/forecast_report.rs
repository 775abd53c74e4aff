use bikecast::forecast::metrics::holdout_accuracy;
use bikecast::forecast::models::arima::ArimaModel;
use bikecast::forecast::models::{ForecastModel, TrainedForecastModel};
use bikecast::{ArimaOrder, Dataset};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Bikecast: Daily Demand Forecast");
    println!("===============================\n");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/SeoulBikeData.csv".to_string());
    let dataset = Dataset::from_csv(&path)?;
    let (first, last) = dataset.date_range();
    println!("Loaded {} hourly rows from {} to {}\n", dataset.len(), first, last);

    println!("Rentals per season:");
    for (season, total) in dataset.season_totals() {
        println!("  {:<7} {:>12.0}", season.label(), total);
    }

    let daily = dataset.daily_totals()?;
    if !daily.is_regular() {
        println!("\nWarning: daily series has missing dates");
    }

    let model = ArimaModel::new(ArimaOrder::new(5, 1, 0));
    let trained = model.train(&daily)?;
    let summary = trained.summary();
    println!(
        "\n{} fitted on {} days in {} iterations (sigma2 = {:.1})",
        summary.name, summary.observations, summary.iterations, summary.sigma2
    );
    println!("AR coefficients: {:?}", summary.ar_coefficients);

    let accuracy = holdout_accuracy(&model, &daily, 14)?;
    println!("Last 14 days held out: {}", accuracy);

    let forecast = trained.forecast(50)?;
    println!("\nNext 10 of {} forecast days (95% band):", forecast.horizon());
    for point in forecast.points().iter().take(10) {
        println!(
            "  {}  {:>8.0}  [{:>8.0}, {:>8.0}]",
            point.timestamp.date(),
            point.value,
            point.lower,
            point.upper
        );
    }

    Ok(())
}
