// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use secrecy::ExposeSecret as _;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tabled::Tabled;

use crate::{
    config::Config,
    error::Result,
    transport::{Body, Request, Response},
};

/// A downstream endpoint that requires a service ticket. The session derives
/// a ticket for [`Executor::SERVICE`], builds the request with it and parses
/// a successful response.
pub(crate) trait Executor: Send + Sync {
    const SERVICE: &'static str;

    type Response: DeserializeOwned + Send;

    fn request(&self, config: &Config, ticket: &str) -> Result<Request>;

    fn parse(&self, resp: &Response) -> Result<Self::Response> {
        resp.json()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct Intake {
    pub(crate) intake_code: String,
    pub(crate) course_description: String,
    pub(crate) type_of_course: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum Gpa {
    Number(f64),
    Text(String),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct SemesterRecord {
    #[serde(default)]
    pub(crate) immigration_gpa: Option<Gpa>,
}

impl SemesterRecord {
    pub(crate) fn gpa(&self) -> Option<f64> {
        match self.immigration_gpa.as_ref()? {
            Gpa::Number(n) => Some(*n),
            Gpa::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct AttendanceModule {
    pub(crate) module_attendance: String,
    pub(crate) percentage: f64,
    pub(crate) semester: i64,
}

#[derive(Clone, Debug, Deserialize, Tabled)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct TimetableEntry {
    #[tabled(rename = "Module")]
    pub(crate) module_name: String,
    #[tabled(skip)]
    pub(crate) intake: String,
    #[serde(default)]
    #[tabled(rename = "Day")]
    pub(crate) day: String,
    #[tabled(rename = "From")]
    pub(crate) time_from_iso: DateTime<FixedOffset>,
    #[tabled(rename = "To")]
    pub(crate) time_to_iso: DateTime<FixedOffset>,
    #[serde(default)]
    #[tabled(rename = "Room")]
    pub(crate) room: String,
    #[serde(default, rename = "NAME")]
    #[tabled(rename = "Lecturer")]
    pub(crate) lecturer: String,
}

fn student_request(config: &Config, resource: &str, query: &[(&str, &str)]) -> Result<Request> {
    let mut url = config.student_url(resource)?;
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            _ = pairs.append_pair(key, value);
        }
    }
    Ok(Request::get(url))
}

pub(crate) struct Courses;

impl Executor for Courses {
    const SERVICE: &'static str = "student/courses";

    type Response = Vec<Intake>;

    fn request(&self, config: &Config, ticket: &str) -> Result<Request> {
        student_request(config, "courses", &[("ticket", ticket)])
    }
}

pub(crate) struct SubAndCourseDetails<'intake> {
    pub(crate) intake: &'intake str,
}

impl Executor for SubAndCourseDetails<'_> {
    const SERVICE: &'static str = "student/sub_and_course_details";

    type Response = Vec<SemesterRecord>;

    fn request(&self, config: &Config, ticket: &str) -> Result<Request> {
        student_request(
            config,
            "sub_and_course_details",
            &[("intake", self.intake), ("ticket", ticket)],
        )
    }
}

pub(crate) struct Attendance<'intake> {
    pub(crate) intake: &'intake str,
}

impl Executor for Attendance<'_> {
    const SERVICE: &'static str = "student/attendance";

    type Response = Vec<AttendanceModule>;

    fn request(&self, config: &Config, ticket: &str) -> Result<Request> {
        student_request(
            config,
            "attendance",
            &[("intake", self.intake), ("ticket", ticket)],
        )
    }
}

const UPDATE_ATTENDANCE_QUERY: &str = "mutation updateAttendance($otp: String!) {updateAttendance(otp: $otp) {id   attendance    classcode    date    startTime    endTime    classType    __typename  }}";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphqlRequest<V> {
    operation_name: &'static str,
    variables: V,
    query: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct OtpVariables {
    otp: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttendanceRecord {
    #[serde(default)]
    pub(crate) id: Option<String>,
    pub(crate) attendance: String,
    #[serde(default)]
    pub(crate) classcode: Option<String>,
    #[serde(default)]
    pub(crate) date: Option<String>,
    #[serde(default)]
    pub(crate) start_time: Option<String>,
    #[serde(default)]
    pub(crate) end_time: Option<String>,
    #[serde(default)]
    pub(crate) class_type: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateAttendanceData {
    #[serde(default)]
    pub(crate) update_attendance: Option<AttendanceRecord>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct GraphqlError {
    pub(crate) message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct UpdateAttendanceResponse {
    #[serde(default)]
    pub(crate) data: Option<UpdateAttendanceData>,
    #[serde(default)]
    pub(crate) errors: Vec<GraphqlError>,
}

/// Signs attendance with an already formatted three-digit OTP.
pub(crate) struct UpdateAttendance {
    pub(crate) otp: String,
}

impl UpdateAttendance {
    fn payload(&self) -> GraphqlRequest<OtpVariables> {
        GraphqlRequest {
            operation_name: "updateAttendance",
            variables: OtpVariables {
                otp: self.otp.clone(),
            },
            query: UPDATE_ATTENDANCE_QUERY,
        }
    }
}

impl Executor for UpdateAttendance {
    const SERVICE: &'static str = "attendix";

    type Response = UpdateAttendanceResponse;

    fn request(&self, config: &Config, ticket: &str) -> Result<Request> {
        Ok(Request::post(
            config.attendix_url().clone(),
            Body::Json(serde_json::to_value(self.payload())?),
        )
        .with_header("ticket", ticket)
        .with_header("x-api-key", config.api_key().expose_secret().clone())
        .with_header("x-amz-user-agent", "aws-amplify/2.0.7"))
    }
}
