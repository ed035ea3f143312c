// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use log::{error, info};

use crate::{
    api::{UpdateAttendance, UpdateAttendanceResponse},
    error::{self, Error, Result},
    session::Session,
    storage,
    ticket::Cached,
    transport::Transport,
};

const OTP_LENGTH: usize = 3;

/// A class attendance passcode in the range `000..=999`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Otp(u16);

impl Otp {
    pub(crate) fn new(value: u16) -> Result<Self> {
        if value > 999 {
            return Err(Error::OtpFormat(format!("{value} has more than three digits")));
        }
        Ok(Self(value))
    }
}

impl FromStr for Otp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.chars().count() != OTP_LENGTH {
            return Err(Error::OtpFormat(format!(
                "expected {OTP_LENGTH} digits, got {}",
                s.chars().count()
            )));
        }
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::OtpFormat("OTP must only contain digits".to_owned()));
        }
        s.parse::<u16>()
            .map_err(|e| Error::OtpFormat(e.to_string()))
            .and_then(Self::new)
    }
}

impl fmt::Display for Otp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// How the attendance service answered a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Signed { class_code: String },
    Rejected { message: String },
    NotRecorded { attendance: String },
    Malformed,
}

impl From<UpdateAttendanceResponse> for Outcome {
    fn from(value: UpdateAttendanceResponse) -> Self {
        match value.data.and_then(|data| data.update_attendance) {
            Some(record) if record.attendance == "Y" => match record.classcode {
                Some(class_code) if !class_code.trim().is_empty() => Self::Signed { class_code },
                Some(_) | None => Self::Malformed,
            },
            Some(record) => Self::NotRecorded {
                attendance: record.attendance,
            },
            None => match value.errors.into_iter().next() {
                Some(err) => Self::Rejected {
                    message: err.message,
                },
                None => Self::Malformed,
            },
        }
    }
}

/// Validates `raw`, signs attendance with it and returns the class code.
/// Nothing is sent unless `raw` is exactly three digits.
pub(crate) async fn submit<T: Transport, S: storage::Storage<Cached>>(
    session: &Session<T, S>,
    raw: &str,
) -> Result<String> {
    let otp: Otp = raw.parse()?;
    let resp = session
        .execute(&UpdateAttendance {
            otp: otp.to_string(),
        })
        .await?;

    match Outcome::from(resp) {
        Outcome::Signed { class_code } => {
            info!("Signed attendance for {}", class_code);
            Ok(class_code)
        }
        Outcome::Rejected { message } => {
            error!("Attendance service rejected the OTP: {}", message);
            Err(Error::Otp(message))
        }
        Outcome::NotRecorded { attendance } => Err(Error::Otp(format!(
            "attendance was not recorded (status {attendance:?})"
        ))),
        Outcome::Malformed => Err(error::DataShape::EmptyAttendanceResponse.into()),
    }
}
