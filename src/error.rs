use std::error::Error;

use rusoto_cloudwatch::GetMetricStatisticsError;
use rusoto_core::RusotoError;
use rusoto_sns::PublishError;
use rusoto_sts::GetCallerIdentityError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::num::TryFromIntError;

#[derive(Debug, PartialEq)]
pub enum ReporterError {
    NoneValue,
    ToPrimitive,
    TryFromIntError,
    InvalidTime,
    InvalidRegion(String),
    MissingEnv(&'static str),
    UnknownReportKind(String),
    Render(String),
    GetMetrics(RusotoError<GetMetricStatisticsError>),
    Identity(RusotoError<GetCallerIdentityError>),
    Publish(RusotoError<PublishError>),
    Listing(String),
}

impl Display for ReporterError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ReporterError::NoneValue => write!(f, "Value is None"),
            ReporterError::ToPrimitive => {
                write!(f, "Failed to convert bigDecimal to primitive")
            }
            ReporterError::TryFromIntError => write!(f, "Failed to convert int"),
            ReporterError::InvalidTime => write!(f, "Failed to build a calendar timestamp"),
            ReporterError::InvalidRegion(ref name) => write!(f, "Unknown region: {}", name),
            ReporterError::MissingEnv(name) => {
                write!(f, "Missing environment variable: {}", name)
            }
            ReporterError::UnknownReportKind(ref kind) => {
                write!(f, "Unknown report type: {}", kind)
            }
            ReporterError::Render(ref message) => {
                write!(f, "Failed to render report: {}", message)
            }
            ReporterError::GetMetrics(ref error) => Display::fmt(error, f),
            ReporterError::Identity(ref error) => Display::fmt(error, f),
            ReporterError::Publish(ref error) => Display::fmt(error, f),
            ReporterError::Listing(ref message) => write!(f, "Listing failed: {}", message),
        }
    }
}

impl Error for ReporterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ReporterError::GetMetrics(ref error) => Some(error),
            ReporterError::Identity(ref error) => Some(error),
            ReporterError::Publish(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<TryFromIntError> for ReporterError {
    fn from(_: TryFromIntError) -> ReporterError {
        ReporterError::TryFromIntError
    }
}

impl From<RusotoError<GetMetricStatisticsError>> for ReporterError {
    fn from(e: RusotoError<GetMetricStatisticsError>) -> ReporterError {
        ReporterError::GetMetrics(e)
    }
}

impl From<RusotoError<GetCallerIdentityError>> for ReporterError {
    fn from(e: RusotoError<GetCallerIdentityError>) -> ReporterError {
        ReporterError::Identity(e)
    }
}

impl From<RusotoError<PublishError>> for ReporterError {
    fn from(e: RusotoError<PublishError>) -> ReporterError {
        ReporterError::Publish(e)
    }
}
