// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use crate::{
    api::AttendanceModule,
    error::{self, Result},
    semester::Semester,
};

fn in_semester(
    modules: &[AttendanceModule],
    semester: Semester,
) -> impl Iterator<Item = &AttendanceModule> {
    modules
        .iter()
        .filter(move |module| module.semester == i64::from(semester.number()))
}

/// Average attendance across the modules of `semester`, rounded to two
/// decimal places.
pub(crate) fn percentage(modules: &[AttendanceModule], semester: Semester) -> Result<f64> {
    let (total, count) = in_semester(modules, semester)
        .fold((0.0, 0_u32), |(total, count), module| {
            (total + module.percentage, count + 1)
        });
    if count == 0 {
        return Err(error::DataShape::NoModulesForSemester(semester.number()).into());
    }

    let average = total / f64::from(count);
    Ok((average * 100.0).round() / 100.0)
}

pub(crate) fn module_names(modules: &[AttendanceModule], semester: Semester) -> Vec<String> {
    in_semester(modules, semester)
        .map(|module| module.module_attendance.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, semester: i64, percentage: f64) -> AttendanceModule {
        AttendanceModule {
            module_attendance: name.to_owned(),
            percentage,
            semester,
        }
    }

    #[test]
    fn only_current_semester_counts() {
        let modules = [
            module("Introduction to Networking", 1, 80.0),
            module("Data Structures", 2, 90.0),
            module("Software Engineering", 2, 70.0),
        ];
        assert!((percentage(&modules, Semester::Second).unwrap() - 80.0).abs() < f64::EPSILON);
        assert!((percentage(&modules, Semester::First).unwrap() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_is_rounded_to_two_places() {
        let modules = [
            module("A", 1, 100.0),
            module("B", 1, 90.0),
            module("C", 1, 85.0),
        ];
        assert!((percentage(&modules, Semester::First).unwrap() - 91.67).abs() < 1e-9);
    }

    #[test]
    fn no_modules_is_a_shape_error() {
        let modules = [module("A", 1, 100.0)];
        assert!(matches!(
            percentage(&modules, Semester::Second),
            Err(error::Error::DataShape(error::DataShape::NoModulesForSemester(2)))
        ));
    }

    #[test]
    fn module_names_are_filtered_by_semester() {
        let modules = [module("A", 1, 100.0), module("B", 2, 90.0)];
        assert_eq!(module_names(&modules, Semester::Second), vec!["B".to_owned()]);
    }
}
