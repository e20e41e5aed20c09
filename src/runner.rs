use std::io::Write;
use std::sync::{Arc, Mutex};

use tokio::runtime::{Builder, Runtime};

use crate::config::Config;
use crate::probe::{probe, ProbeError, RequestRecord};

/// Runner structure with configuration and the shared record list.
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
    records: Arc<Mutex<Vec<RequestRecord>>>, // filled one record per probe
}

impl Runner {
    /*------------------==| Public Functions |==-------------------------*/
    /// Create a new Runner instance
    pub fn new(config: Config) -> Self {
        let records = Arc::new(Mutex::new(Vec::with_capacity(config.requests)));
        Self { config, records }
    }

    /// Issue the configured number of probes, strictly one at a time.
    ///
    /// Each probe is awaited to completion (success or error) before the
    /// next is sent. Probe errors are recorded and the run carries on,
    /// unless fail-on-error is set: then the loop stops right after the
    /// first errored probe and that error is returned alongside whatever
    /// records were produced up to and including it.
    pub fn run(&self) -> (Vec<RequestRecord>, Option<ProbeError>) {
        let runtime = Self::build_runtime();
        let mut run_error = None;

        println!(
            "Sending {} request(s) to {} through proxy {}\nPlease be patient..",
            self.config.requests, self.config.target, self.config.proxy
        );

        runtime.block_on(async {
            for sent in 1..=self.config.requests {
                let record = probe(&self.config.proxy, &self.config.target).await;
                let error = record.error.clone();
                self.records.lock().unwrap().push(record);

                print!("\rCompleted requests: {}", sent); // move to the start of line and print
                std::io::stdout().flush().unwrap(); // ensure the output is displayed immediately

                if self.config.fail_on_error {
                    if let Some(err) = error {
                        run_error = Some(err);
                        break;
                    }
                }
            }
        });

        if self.config.requests > 0 {
            println!();
        }

        (self.records(), run_error)
    }

    /// Snapshot of the records collected so far
    pub fn records(&self) -> Vec<RequestRecord> {
        self.records.lock().unwrap().clone()
    }

    /*-------------------==| Private/Helpers |==----------------------- */

    /// The whole run is sequential, so a current-thread runtime is enough
    fn build_runtime() -> Runtime {
        Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    }
}
