// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};

use crate::{
    api::{self, AttendanceModule, TimetableEntry},
    attendance,
    error::{self, Result},
    intake::{self, IntakeQuery, IntakeValue},
    otp,
    semester::{self, Records as _, Semester, Standing},
    session::Session,
    storage,
    ticket::Cached,
    timetable,
    transport::Transport,
};

/// What the bootstrap learned about the student.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Profile {
    pub(crate) intake: String,
    pub(crate) semester: Semester,
}

#[async_trait]
pub(crate) trait Client {
    async fn take_attendance(&self, otp: &str) -> Result<String>;

    async fn attendance_percentage(&self) -> Result<f64>;

    async fn semester_details(&self) -> Result<Standing>;

    async fn intake(&self, query: IntakeQuery) -> Result<IntakeValue>;

    async fn modules(&self) -> Result<Vec<String>>;

    async fn weekly_timetable(&self) -> Result<Vec<TimetableEntry>>;
}

#[async_trait]
impl<C: Client + Sync + ?Sized> Client for &C {
    async fn take_attendance(&self, otp: &str) -> Result<String> {
        (**self).take_attendance(otp).await
    }

    async fn attendance_percentage(&self) -> Result<f64> {
        (**self).attendance_percentage().await
    }

    async fn semester_details(&self) -> Result<Standing> {
        (**self).semester_details().await
    }

    async fn intake(&self, query: IntakeQuery) -> Result<IntakeValue> {
        (**self).intake(query).await
    }

    async fn modules(&self) -> Result<Vec<String>> {
        (**self).modules().await
    }

    async fn weekly_timetable(&self) -> Result<Vec<TimetableEntry>> {
        (**self).weekly_timetable().await
    }
}

/// A logged-in student. Owns the session for its whole lifetime; call
/// [`Apspace::close`] to release it.
pub(crate) struct Apspace<T: Transport, S: storage::Storage<Cached>> {
    session: Session<T, S>,
    profile: Profile,
}

impl<T: Transport, S: storage::Storage<Cached>> Apspace<T, S> {
    /// Logs in with fresh credentials, discarding any cached ticket.
    pub(crate) async fn login(session: Session<T, S>) -> Result<Self> {
        session.login().await?;
        Self::bootstrap(session).await
    }

    /// Reuses a cached master ticket when there is one and logs in otherwise.
    pub(crate) async fn connect(session: Session<T, S>) -> Result<Self> {
        if session.has_ticket().await? {
            debug!("Reusing cached master ticket");
        } else {
            session.login().await?;
        }
        Self::bootstrap(session).await
    }

    async fn bootstrap(session: Session<T, S>) -> Result<Self> {
        let intakes = session.intakes().await?;
        let intake = intakes
            .first()
            .ok_or(error::DataShape::NoIntakes)?
            .intake_code
            .clone();
        let semester = semester::current_semester(&session, &intake).await?;
        info!("Current intake is {}, semester {}", intake, semester);

        Ok(Self {
            session,
            profile: Profile { intake, semester },
        })
    }

    #[cfg(test)]
    pub(crate) fn profile(&self) -> &Profile {
        &self.profile
    }

    pub(crate) fn close(self) {
        self.session.close();
    }

    async fn attendance_records(&self) -> Result<Vec<AttendanceModule>> {
        self.session
            .execute(&api::Attendance {
                intake: &self.profile.intake,
            })
            .await
    }
}

#[async_trait]
impl<T: Transport, S: storage::Storage<Cached>> Client for Apspace<T, S> {
    async fn take_attendance(&self, otp: &str) -> Result<String> {
        otp::submit(&self.session, otp).await
    }

    async fn attendance_percentage(&self) -> Result<f64> {
        attendance::percentage(&self.attendance_records().await?, self.profile.semester)
    }

    async fn semester_details(&self) -> Result<Standing> {
        semester::resolve(&self.session, &self.profile.intake).await
    }

    async fn intake(&self, query: IntakeQuery) -> Result<IntakeValue> {
        intake::select(&self.session.intakes().await?, query)
    }

    async fn modules(&self) -> Result<Vec<String>> {
        Ok(attendance::module_names(
            &self.attendance_records().await?,
            self.profile.semester,
        ))
    }

    async fn weekly_timetable(&self) -> Result<Vec<TimetableEntry>> {
        let entries: Vec<TimetableEntry> = self
            .session
            .fetch(self.session.config().timetable_url().clone())
            .await?;
        let modules = self.modules().await?;
        Ok(timetable::upcoming(
            entries,
            &modules,
            &self.profile.intake,
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        session::tests::{authenticated, session, LOGIN_PATH},
        transport::{scripted::Scripted, Method},
    };

    const COURSES: &str = r#"[
        {"INTAKE_CODE": "UC2F2209CS", "COURSE_DESCRIPTION": "BSc (Hons) in Computer Science", "TYPE_OF_COURSE": "Degree"},
        {"INTAKE_CODE": "UCDF2005ICT", "COURSE_DESCRIPTION": "Diploma in ICT", "TYPE_OF_COURSE": "Diploma"}
    ]"#;

    const ATTENDANCE: &str = r#"[
        {"MODULE_ATTENDANCE": "Introduction to Networking", "PERCENTAGE": 80, "SEMESTER": 1},
        {"MODULE_ATTENDANCE": "Data Structures & Algorithms", "PERCENTAGE": 90, "SEMESTER": 2},
        {"MODULE_ATTENDANCE": "Software Engineering", "PERCENTAGE": 70, "SEMESTER": 2}
    ]"#;

    const TIMETABLE: &str = r#"[
        {"MODULE_NAME": "DATA STRUCTURES AND ALGORITHMS", "INTAKE": "UC2F2209CS", "DAY": "MON", "TIME_FROM_ISO": "2099-01-05T08:30:00+08:00", "TIME_TO_ISO": "2099-01-05T10:30:00+08:00", "ROOM": "B-06-05", "NAME": "Jane Doe"},
        {"MODULE_NAME": "DATA STRUCTURES AND ALGORITHMS", "INTAKE": "UC2F2209CS", "DAY": "MON", "TIME_FROM_ISO": "2001-01-01T08:30:00+08:00", "TIME_TO_ISO": "2001-01-01T10:30:00+08:00", "ROOM": "B-06-05", "NAME": "Jane Doe"},
        {"MODULE_NAME": "INTRODUCTION TO NETWORKING", "INTAKE": "UC2F2209CS", "DAY": "TUE", "TIME_FROM_ISO": "2099-01-06T08:30:00+08:00", "TIME_TO_ISO": "2099-01-06T10:30:00+08:00", "ROOM": "B-04-02", "NAME": "John Roe"}
    ]"#;

    fn student(rows: &str) -> Scripted {
        authenticated()
            .on(Method::Get, "/student/courses", 200, COURSES)
            .on(Method::Get, "/student/sub_and_course_details", 200, rows)
            .on(Method::Get, "/student/attendance", 200, ATTENDANCE)
            .on(Method::Get, "/open-ws/weektimetable", 200, TIMETABLE)
    }

    const SECOND_SEMESTER: &str = r#"[{"IMMIGRATION_GPA": "3.40"}, {}]"#;

    #[tokio::test]
    async fn login_bootstraps_profile() {
        let client = Apspace::login(session(student(SECOND_SEMESTER)))
            .await
            .unwrap();
        assert_eq!(
            *client.profile(),
            Profile {
                intake: "UC2F2209CS".to_owned(),
                semester: Semester::Second,
            }
        );
    }

    #[tokio::test]
    async fn connect_reuses_existing_ticket() {
        let session = session(student(SECOND_SEMESTER));
        session.login().await.unwrap();

        let client = Apspace::connect(session).await.unwrap();
        assert_eq!(client.session.transport().count(Method::Post, LOGIN_PATH), 1);
    }

    #[tokio::test]
    async fn bootstrap_requires_an_intake() {
        let transport = authenticated().on(Method::Get, "/student/courses", 200, "[]");
        assert!(matches!(
            Apspace::login(session(transport)).await,
            Err(Error::DataShape(error::DataShape::NoIntakes))
        ));
    }

    #[tokio::test]
    async fn percentage_uses_bootstrapped_semester() {
        let client = Apspace::login(session(student(SECOND_SEMESTER)))
            .await
            .unwrap();
        assert!((client.attendance_percentage().await.unwrap() - 80.0).abs() < f64::EPSILON);
        assert_eq!(
            client.modules().await.unwrap(),
            vec![
                "Data Structures & Algorithms".to_owned(),
                "Software Engineering".to_owned()
            ]
        );
    }

    #[tokio::test]
    async fn semester_details_resolve_current_intake() {
        let client = Apspace::login(session(student(SECOND_SEMESTER)))
            .await
            .unwrap();
        let standing = client.semester_details().await.unwrap();
        assert_eq!(standing.semester, Semester::Second);
        assert!((standing.gpa - 3.4).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn timetable_keeps_upcoming_classes_for_current_modules() {
        let client = Apspace::login(session(student(SECOND_SEMESTER)))
            .await
            .unwrap();
        let classes = client.weekly_timetable().await.unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].room, "B-06-05");
        assert_eq!(classes[0].lecturer, "Jane Doe");
    }

    #[tokio::test]
    async fn intake_queries_read_course_list() {
        let client = Apspace::login(session(student(SECOND_SEMESTER)))
            .await
            .unwrap();
        assert_eq!(
            client.intake(IntakeQuery::PreviousIntake).await.unwrap(),
            IntakeValue::PreviousIntake(Some("UCDF2005ICT".to_owned()))
        );
    }
}
