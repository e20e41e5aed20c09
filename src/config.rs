use std::env;
use std::slice::Iter;
use url::Url;

// Error messages
const ERR_PROXY_NOT_PROVIDED: &str = "Proxy URL not provided\nUse --help for more info";
const ERR_INVALID_PROXY: &str = "Invalid proxy URL\nUse --help for more info";
const ERR_INVALID_TARGET: &str = "Invalid target URL\nUse --help for more info";
const ERR_INVALID_REQUESTS: &str = "Invalid number of requests\nUse --help for more info";

// Fetched through the proxy when no target is given
const DEFAULT_TARGET: &str = "https://example.com";

// Parse arguments for CLI
#[derive(Debug, Clone)]
pub struct Config {
    pub proxy: String, // proxy under test
    pub target: String, // URL fetched through the proxy
    pub requests: usize, // number of sequential requests
    pub fail_on_error: bool, // stop the run on the first failed request
}

// Default values, a single request against the placeholder target
impl Default for Config {
    fn default() -> Self {
        Config {
            proxy: "".to_string(),
            target: DEFAULT_TARGET.to_string(),
            requests: 1,
            fail_on_error: false,
        }
    }
}

impl Config {
    /*-------------------- Public Functions -------------------*/
    /// Parse the process arguments, printing help or the error and exiting
    /// when the invocation is unusable
    pub fn parse() -> Config {
        let args: Vec<String> = env::args().skip(1).collect();

        if args.is_empty() {
            // no arguments given
            Self::print_help();
            std::process::exit(0);
        }

        Self::from_args(&args).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        })
    }

    /// Parse an argument list (without the program name)
    pub fn from_args(args: &[String]) -> Result<Config, String> {
        let mut parsed_config = Self::default();
        let mut args_iter = args.iter();
        let mut proxy_provided = false; // so the proxy is not taken more than once

        while let Some(arg) = args_iter.next() {
            if Self::handle_help(arg) || Self::handle_version(arg) {
                // check for -h / --help and -v / --version flags
                std::process::exit(0);
            }

            if Self::handle_target(&mut parsed_config, arg, &mut args_iter)?
                || Self::handle_requests(&mut parsed_config, arg, &mut args_iter)?
                || Self::handle_fail_on_error(&mut parsed_config, arg)
                || Self::handle_proxy(&mut parsed_config, arg, &mut proxy_provided)?
            {
                continue;
            } else {
                return Err(format!("Unknown argument \"{}\"\nUse --help for more info", arg));
            }
        }

        if !proxy_provided {
            return Err(ERR_PROXY_NOT_PROVIDED.to_string());
        }

        Ok(parsed_config)
    }

    pub fn print_help() {
        let name = env!("CARGO_PKG_NAME");
        println!("Usage: {} [OPTIONS] <PROXY_URL>", name);
        println!();
        println!("{} powered by nayaraasta", name);
        println!();
        println!("Options:");
        println!("  -t, --target        <URL>  Target URL fetched through the proxy");
        println!("                              (Default: {})", DEFAULT_TARGET);
        println!("  -n, --requests      <N>    Number of requests (Default: 1)");
        println!("  -f, --fail-on-error        Stop the run on the first failed request");
        println!("  -h, --help                 Print help (this)");
        println!("  -v, --version              Print version");
        println!();
        println!("Arguments:");
        println!("  <PROXY_URL>                Proxy URL to benchmark");
        println!();
        println!("Requests are sent strictly one at a time; the run ends after");
        println!("-n requests, or at the first error when -f is given.");
    }

    /*---------------- Private/Helpers ------------------*/
    fn handle_target(
        parsed_config: &mut Config,
        arg: &str,
        args_iter: &mut Iter<String>,
    ) -> Result<bool, String> {
        if arg.starts_with("-t") || arg.starts_with("--target") {
            Self::parse_target(parsed_config, arg, args_iter)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn handle_requests(
        parsed_config: &mut Config,
        arg: &str,
        args_iter: &mut Iter<String>,
    ) -> Result<bool, String> {
        if arg.starts_with("-n") || arg.starts_with("--requests") {
            Self::parse_requests(parsed_config, arg, args_iter)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn handle_fail_on_error(parsed_config: &mut Config, arg: &str) -> bool {
        if arg == "-f" || arg == "--fail-on-error" {
            parsed_config.fail_on_error = true;
            true
        } else {
            false
        }
    }

    fn handle_help(arg: &str) -> bool {
        if arg == "-h" || arg == "--help" {
            Self::print_help();
            true
        } else {
            false
        }
    }

    fn handle_version(arg: &str) -> bool {
        if arg == "-v" || arg == "--version" {
            let name = env!("CARGO_PKG_NAME");
            let version = env!("CARGO_PKG_VERSION");
            println!("{} {}", name, version);
            true
        } else {
            false
        }
    }

    fn handle_proxy(
        parsed_config: &mut Config,
        arg: &str,
        is_proxy_set: &mut bool,
    ) -> Result<bool, String> {
        if !*is_proxy_set && !arg.starts_with('-') {
            // Check that the proxy url is correct
            if Url::parse(arg).is_err() {
                return Err(format!("\"{}\"\n{}", arg, ERR_INVALID_PROXY));
            }
            parsed_config.proxy = arg.to_string();
            *is_proxy_set = true;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_target(
        parsed_config: &mut Config,
        arg: &str,
        args_iter: &mut Iter<String>,
    ) -> Result<(), String> {
        let value = if let Some(strip) = arg.strip_prefix("--target") {
            Self::string_value(args_iter, strip, ERR_INVALID_TARGET)?
        } else if let Some(strip) = arg.strip_prefix("-t") {
            Self::string_value(args_iter, strip, ERR_INVALID_TARGET)?
        } else {
            return Err(ERR_INVALID_TARGET.to_string());
        };

        // Check that the target url is correct
        if Url::parse(&value).is_err() {
            return Err(format!("\"{}\"\n{}", value, ERR_INVALID_TARGET));
        }
        parsed_config.target = value;
        Ok(())
    }

    fn parse_requests(
        parsed_config: &mut Config,
        arg: &str,
        args_iter: &mut Iter<String>,
    ) -> Result<(), String> {
        let strip = arg
            .strip_prefix("--requests")
            .or_else(|| arg.strip_prefix("-n"))
            .ok_or_else(|| ERR_INVALID_REQUESTS.to_string())?;

        // a count of 0 is allowed and yields an empty run
        parsed_config.requests = match strip.parse() {
            Ok(value) => value,
            Err(_) => Self::parse_with_next_usize(args_iter, strip, ERR_INVALID_REQUESTS)?,
        };
        Ok(())
    }

    // for -n 10 (space between flag and value)
    fn parse_with_next_usize(
        args_iter: &mut Iter<String>,
        strip: &str,
        error_msg: &str,
    ) -> Result<usize, String> {
        if !strip.is_empty() {
            // other (invalid) characters were written after the flag
            return Err(error_msg.to_string());
        }
        args_iter
            .next()
            .and_then(|next| next.parse().ok())
            .ok_or_else(|| error_msg.to_string())
    }

    // for -t URL / --target URL, with the attached form -tURL also accepted
    fn string_value(
        args_iter: &mut Iter<String>,
        strip: &str,
        error_msg: &str,
    ) -> Result<String, String> {
        if !strip.is_empty() {
            return Ok(strip.to_string());
        }
        args_iter
            .next()
            .cloned()
            .ok_or_else(|| error_msg.to_string())
    }
}
