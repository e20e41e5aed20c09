use std::time::Duration;

use proxybench::config::Config;
use proxybench::report::{aggregate, Summary};
use proxybench::runner::Runner;

fn main() {
    let config = Config::parse();

    let runner = Runner::new(config);

    let runner_clone = runner.clone();

    ctrlc::set_handler(move || {
        // report whatever was collected before the interrupt
        print_report(&aggregate(&runner_clone.records()));
        std::process::exit(0);
    })
    .expect("Error setting Ctrl+C handler");

    let (records, run_error) = runner.run();

    if let Some(err) = &run_error {
        eprintln!("Run stopped early: {}", err);
    }

    print_report(&aggregate(&records));

    if run_error.is_some() {
        std::process::exit(1);
    }
}

/*---------= Everything related to printing =----------*/
fn print_report(summary: &Summary) {
    println!("\nResults:");
    println!("{:<25} {:<15} {:<15} {:<15}", "Metric", "Average", "P95", "Unit");
    print_phase("Connect Time", summary.avg_connect_time, summary.p95_connect_time);
    print_phase("First Byte Time", summary.avg_first_byte_time, summary.p95_first_byte_time);
    print_phase("Total Time", summary.avg_total_time, summary.p95_total_time);
    println!("{:<25} {:<15} {:<15} {:<15}", "Error Count", summary.error_count, "-", "-");
    println!(
        "{:<25} {:<15.2} {:<15} {:<15}",
        "Error Rate",
        summary.error_rate * 100.0,
        "-",
        "%"
    );

    println!("\nStatus Code Distribution:");
    println!("{:<15} {:<15}", "Status Code", "Count");
    for (code, count) in &summary.status_codes {
        println!("{:<15} {:<15}", code, count);
    }
}

fn print_phase(name: &str, avg: Duration, p95: Duration) {
    println!("{:<25} {:<15.2} {:<15.2} {:<15}", name, ms(avg), ms(p95), "ms");
}

fn ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
