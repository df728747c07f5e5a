//! Command-line parsing
//!
//! `aip-call [--config <path>] --url <endpoint> [--json] [--image <file>] [key=value ...]`

use std::path::PathBuf;

use clap::Parser;

/// Issue one authenticated AIP call and print the JSON response
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(name = "aip-call", version)]
pub struct Args {
    /// Config file (overrides AIP_CONFIG)
    #[arg(long)]
    pub config: Option<String>,

    /// Endpoint to call
    #[arg(long)]
    pub url: String,

    /// Send the body as JSON instead of a form
    #[arg(long)]
    pub json: bool,

    /// File sent base64-encoded as the `image` field
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Body fields as key=value
    #[arg(value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

/// Split on the first `=`; the value may itself contain `=`.
fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("aip-call").chain(args.iter().copied()))
    }

    #[test]
    fn full_command_line() {
        let args = parse(&[
            "--config",
            "/etc/aip.toml",
            "--url",
            "https://aip.baidubce.com/rest/2.0/ocr/v1/general_basic",
            "--image",
            "scan.jpg",
            "language_type=CHN_ENG",
            "detect_direction=true",
        ])
        .unwrap();

        assert_eq!(args.config.as_deref(), Some("/etc/aip.toml"));
        assert_eq!(args.url, "https://aip.baidubce.com/rest/2.0/ocr/v1/general_basic");
        assert_eq!(args.image, Some(PathBuf::from("scan.jpg")));
        assert!(!args.json);
        assert_eq!(
            args.fields,
            vec![
                ("language_type".to_string(), "CHN_ENG".to_string()),
                ("detect_direction".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn json_flag_and_value_with_equals() {
        let args = parse(&["--json", "--url", "http://x/y", "text=a=b"]).unwrap();
        assert!(args.json);
        assert!(args.config.is_none());
        assert_eq!(args.fields, vec![("text".to_string(), "a=b".to_string())]);
    }

    #[test]
    fn url_is_required() {
        let err = parse(&["image=abc"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn flag_without_value_is_rejected() {
        assert!(parse(&["--url"]).is_err());
        assert!(parse(&["--config", "--url", "http://x"]).is_err());
    }

    #[test]
    fn unknown_flag_and_malformed_field_are_rejected() {
        let err = parse(&["--url", "http://x", "--verbose"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = parse(&["--url", "http://x", "oops"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(parse(&["--url", "http://x", "=v"]).is_err());
    }

    #[test]
    fn field_parser_keeps_empty_value() {
        assert_eq!(parse_field("k="), Ok(("k".to_string(), String::new())));
    }
}
