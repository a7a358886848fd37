use crate::error::ReporterError;
use crate::report_kind::ReportKind;
use std::env;
use std::str::FromStr;

const TOPIC_ARN_VAR: &str = "TOPIC_ARN";
const REPORT_TYPE_VAR: &str = "REPORT_TYPE";

/// Runtime configuration supplied through the function's environment. The
/// schedule itself lives in the event rule and never reaches this code.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub topic_arn: String,
    pub report_kind: ReportKind,
}

impl Config {
    pub fn from_env() -> Result<Self, ReporterError> {
        let topic_arn =
            env::var(TOPIC_ARN_VAR).map_err(|_| ReporterError::MissingEnv(TOPIC_ARN_VAR))?;
        let report_type =
            env::var(REPORT_TYPE_VAR).map_err(|_| ReporterError::MissingEnv(REPORT_TYPE_VAR))?;
        Ok(Config {
            topic_arn,
            report_kind: ReportKind::from_str(&report_type)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, REPORT_TYPE_VAR, TOPIC_ARN_VAR};
    use crate::error::ReporterError;
    use crate::report_kind::ReportKind;
    use std::env;

    // Environment is process-wide, so everything runs in one test.
    #[test]
    fn test_from_env() {
        env::remove_var(TOPIC_ARN_VAR);
        env::remove_var(REPORT_TYPE_VAR);
        assert_eq!(
            Config::from_env().err().unwrap(),
            ReporterError::MissingEnv(TOPIC_ARN_VAR)
        );

        env::set_var(TOPIC_ARN_VAR, "arn:aws:sns:us-east-1:123456789012:reports");
        assert_eq!(
            Config::from_env().err().unwrap(),
            ReporterError::MissingEnv(REPORT_TYPE_VAR)
        );

        env::set_var(REPORT_TYPE_VAR, "lightsail");
        assert!(matches!(
            Config::from_env(),
            Err(ReporterError::UnknownReportKind(_))
        ));

        env::set_var(REPORT_TYPE_VAR, "rds");
        let config = Config::from_env().unwrap();
        assert_eq!(config.report_kind, ReportKind::Rds);
        assert_eq!(
            config.topic_arn,
            "arn:aws:sns:us-east-1:123456789012:reports"
        );

        env::remove_var(TOPIC_ARN_VAR);
        env::remove_var(REPORT_TYPE_VAR);
    }
}
