// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use async_recursion::async_recursion;
use async_trait::async_trait;
use log::debug;

use crate::{
    api::{self, Intake, SemesterRecord},
    error::{self, Result},
    intake,
    session::Session,
    storage,
    ticket::Cached,
    transport::Transport,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Semester {
    First,
    Second,
}

impl Semester {
    pub(crate) const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

impl TryFrom<i64> for Semester {
    type Error = error::DataShape;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(error::DataShape::UnknownSemester(other)),
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Standing {
    pub(crate) semester: Semester,
    pub(crate) gpa: f64,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Semester {}, GPA {:.2}", self.semester, self.gpa)
    }
}

/// Where the resolver reads enrollment data from.
#[async_trait]
pub(crate) trait Records: Sync {
    async fn intakes(&self) -> Result<Vec<Intake>>;
    async fn semester_records(&self, intake: &str) -> Result<Vec<SemesterRecord>>;
}

#[async_trait]
impl<T: Transport, S: storage::Storage<Cached>> Records for Session<T, S> {
    async fn intakes(&self) -> Result<Vec<Intake>> {
        self.execute(&api::Courses).await
    }

    async fn semester_records(&self, intake: &str) -> Result<Vec<SemesterRecord>> {
        self.execute(&api::SubAndCourseDetails { intake }).await
    }
}

/// Infers the semester from how many detail rows exist for `intake`.
pub(crate) async fn current_semester<R: Records + ?Sized>(records: &R, intake: &str) -> Result<Semester> {
    let rows = records.semester_records(intake).await?;
    semester_for_rows(intake, rows.len())
}

/// Determines the semester and GPA for `intake`. When the intake has only one
/// row so far, the standing of the intake before it is used instead.
pub(crate) async fn resolve<R: Records + ?Sized>(records: &R, intake: &str) -> Result<Standing> {
    resolve_within(records, &mut None, intake).await
}

// The intake list is only needed for lookback, so it is fetched on first use.
#[async_recursion]
async fn resolve_within<R: Records + ?Sized>(
    records: &R,
    intakes: &mut Option<Vec<Intake>>,
    intake: &str,
) -> Result<Standing> {
    let rows = records.semester_records(intake).await?;
    debug!("Intake {} has {} semester records", intake, rows.len());

    match semester_for_rows(intake, rows.len())? {
        Semester::First => {
            if intakes.is_none() {
                *intakes = Some(records.intakes().await?);
            }
            let previous = intakes
                .as_deref()
                .and_then(|list| intake::previous_of(list, intake))
                .map(|previous| previous.intake_code.clone());

            match previous {
                Some(previous) => {
                    debug!(
                        "Resolving standing of {} from previous intake {}",
                        intake, previous
                    );
                    resolve_within(records, intakes, &previous).await
                }
                None => Ok(Standing {
                    semester: Semester::First,
                    gpa: 0.0,
                }),
            }
        }
        Semester::Second => {
            // The last row belongs to the semester in progress.
            let gpa = rows[rows.len() - 2]
                .gpa()
                .ok_or_else(|| error::DataShape::MissingGpa(intake.to_owned()))?;
            Ok(Standing {
                semester: Semester::Second,
                gpa,
            })
        }
    }
}

fn semester_for_rows(intake: &str, rows: usize) -> Result<Semester> {
    match rows {
        1 => Ok(Semester::First),
        2 => Ok(Semester::Second),
        n => Err(error::DataShape::UnexpectedRecordCount(intake.to_owned(), n).into()),
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use super::*;
    use crate::{api::Gpa, intake::tests::intake};

    struct Fixture {
        intakes: Vec<Intake>,
        rows: HashMap<&'static str, Vec<Option<f64>>>,
        lookups: Mutex<Vec<String>>,
        intake_fetches: Mutex<usize>,
    }

    impl Fixture {
        fn new(intakes: &[&str], rows: &[(&'static str, &[Option<f64>])]) -> Self {
            Self {
                intakes: intakes.iter().copied().map(intake).collect(),
                rows: rows.iter().map(|(k, v)| (*k, v.to_vec())).collect(),
                lookups: Mutex::new(vec![]),
                intake_fetches: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl Records for Fixture {
        async fn intakes(&self) -> Result<Vec<Intake>> {
            *self.intake_fetches.lock().unwrap() += 1;
            Ok(self.intakes.clone())
        }

        async fn semester_records(&self, intake: &str) -> Result<Vec<SemesterRecord>> {
            self.lookups.lock().unwrap().push(intake.to_owned());
            Ok(self
                .rows
                .get(intake)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|gpa| SemesterRecord {
                    immigration_gpa: gpa.map(Gpa::Number),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn single_row_without_previous_intake_is_floor() {
        let fixture = Fixture::new(&["UC2F2209CS"], &[("UC2F2209CS", &[None])]);
        assert_eq!(
            resolve(&fixture, "UC2F2209CS").await.unwrap(),
            Standing {
                semester: Semester::First,
                gpa: 0.0
            }
        );
    }

    #[tokio::test]
    async fn single_row_defers_to_previous_intake() {
        let fixture = Fixture::new(
            &["UC2F2209CS", "UCDF2005ICT"],
            &[
                ("UC2F2209CS", &[None]),
                ("UCDF2005ICT", &[Some(3.1), Some(3.4)]),
            ],
        );
        assert_eq!(
            resolve(&fixture, "UC2F2209CS").await.unwrap(),
            Standing {
                semester: Semester::Second,
                gpa: 3.1
            }
        );
        assert_eq!(
            *fixture.lookups.lock().unwrap(),
            vec!["UC2F2209CS".to_owned(), "UCDF2005ICT".to_owned()]
        );
    }

    #[tokio::test]
    async fn lookback_stops_at_oldest_intake() {
        let fixture = Fixture::new(
            &["C", "B", "A"],
            &[("C", &[None]), ("B", &[None]), ("A", &[None])],
        );
        assert_eq!(
            resolve(&fixture, "C").await.unwrap(),
            Standing {
                semester: Semester::First,
                gpa: 0.0
            }
        );
        assert_eq!(fixture.lookups.lock().unwrap().len(), 3);
        assert_eq!(*fixture.intake_fetches.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn two_rows_use_second_to_last_gpa() {
        let fixture = Fixture::new(&["UC2F2209CS"], &[("UC2F2209CS", &[Some(3.72), None])]);
        assert_eq!(
            resolve(&fixture, "UC2F2209CS").await.unwrap(),
            Standing {
                semester: Semester::Second,
                gpa: 3.72
            }
        );
        assert_eq!(*fixture.intake_fetches.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn two_rows_without_gpa_is_a_shape_error() {
        let fixture = Fixture::new(&["UC2F2209CS"], &[("UC2F2209CS", &[None, None])]);
        assert!(matches!(
            resolve(&fixture, "UC2F2209CS").await,
            Err(error::Error::DataShape(error::DataShape::MissingGpa(_)))
        ));
    }

    #[tokio::test]
    async fn other_row_counts_are_shape_errors() {
        for rows in [&[][..], &[None, None, None][..]] {
            let fixture = Fixture::new(&["UC2F2209CS"], &[("UC2F2209CS", rows)]);
            assert!(matches!(
                resolve(&fixture, "UC2F2209CS").await,
                Err(error::Error::DataShape(error::DataShape::UnexpectedRecordCount(_, n))) if n == rows.len()
            ));
        }
    }

    #[tokio::test]
    async fn current_semester_counts_rows_only() {
        let fixture = Fixture::new(
            &["UC2F2209CS", "UCDF2005ICT"],
            &[("UC2F2209CS", &[None]), ("UCDF2005ICT", &[Some(3.0), None])],
        );
        assert_eq!(
            current_semester(&fixture, "UC2F2209CS").await.unwrap(),
            Semester::First
        );
        assert_eq!(fixture.lookups.lock().unwrap().len(), 1);
    }

    #[test]
    fn semester_numbers_convert() {
        assert_eq!(Semester::try_from(2).unwrap(), Semester::Second);
        assert!(Semester::try_from(3).is_err());
    }
}
