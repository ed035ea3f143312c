// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use clap::ValueEnum;

use crate::{
    api::Intake,
    error::{self, Result},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum IntakeQuery {
    CurrentIntake,
    PreviousIntake,
    CourseName,
    CourseType,
    AllCurrent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum IntakeValue {
    CurrentIntake(String),
    PreviousIntake(Option<String>),
    CourseName(String),
    CourseType(String),
    AllCurrent {
        intake: String,
        previous_intake: Option<String>,
        course_name: String,
        course_type: String,
    },
}

impl fmt::Display for IntakeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CurrentIntake(ref value) | Self::CourseName(ref value) | Self::CourseType(ref value) => {
                f.write_str(value)
            }
            Self::PreviousIntake(ref value) => f.write_str(value.as_deref().unwrap_or("-")),
            Self::AllCurrent {
                ref intake,
                ref previous_intake,
                ref course_name,
                ref course_type,
            } => {
                writeln!(f, "Intake: {intake}")?;
                writeln!(
                    f,
                    "Previous intake: {}",
                    previous_intake.as_deref().unwrap_or("-")
                )?;
                writeln!(f, "Course: {course_name}")?;
                write!(f, "Type: {course_type}")
            }
        }
    }
}

/// Picks a value out of the intake list, which is ordered most recent first.
pub(crate) fn select(intakes: &[Intake], query: IntakeQuery) -> Result<IntakeValue> {
    let current = intakes.first().ok_or(error::DataShape::NoIntakes)?;
    let previous = || previous_of(intakes, &current.intake_code).map(|i| i.intake_code.clone());

    Ok(match query {
        IntakeQuery::CurrentIntake => IntakeValue::CurrentIntake(current.intake_code.clone()),
        IntakeQuery::PreviousIntake => IntakeValue::PreviousIntake(previous()),
        IntakeQuery::CourseName => IntakeValue::CourseName(current.course_description.clone()),
        IntakeQuery::CourseType => IntakeValue::CourseType(current.type_of_course.clone()),
        IntakeQuery::AllCurrent => IntakeValue::AllCurrent {
            intake: current.intake_code.clone(),
            previous_intake: previous(),
            course_name: current.course_description.clone(),
            course_type: current.type_of_course.clone(),
        },
    })
}

/// The intake enrolled in immediately before `code`, if any. Walking this
/// repeatedly always moves towards the end of the list.
pub(crate) fn previous_of<'intakes>(
    intakes: &'intakes [Intake],
    code: &str,
) -> Option<&'intakes Intake> {
    let position = intakes.iter().position(|i| i.intake_code == code)?;
    intakes.get(position + 1)
}
