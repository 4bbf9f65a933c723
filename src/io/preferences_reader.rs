use crate::model::{PreferenceGraph, Student, TcpcError, MAX_STUDENTS};
use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, BufReader, Read};

/// A reader for preference files.
///
/// # Preference format
///
/// The first non-empty line gives the number of students.
/// Each further line is made of a student id followed by the ids of the classmates this student prefers, separated by whitespaces.
/// Ids start at 1. Students with no line have no preference; blank lines are ignored.
///
/// The following content describes a class of 7 students in which 1 and 2 prefer each other, and 5 prefers 6 and 7.
///
/// ```text
/// 7
/// 1 2
/// 2 1
/// 5 6 7
/// ```
///
/// Malformed contents (non integer tokens, ids out of range, self references, duplicated ids, a student given twice)
/// are rejected with a [TcpcError::MalformedPreferenceData] error mentioning the line number.
#[derive(Default)]
pub struct PreferencesReader;

fn malformed_at_line(line_number: usize, e: TcpcError) -> anyhow::Error {
    let msg = match e {
        TcpcError::MalformedPreferenceData(msg) => msg,
        other => other.to_string(),
    };
    anyhow!(TcpcError::MalformedPreferenceData(format!(
        "line {}: {}",
        line_number, msg
    )))
}

fn parse_id(line_number: usize, word: &str) -> Result<usize> {
    word.parse::<usize>().map_err(|_| {
        malformed_at_line(
            line_number,
            TcpcError::MalformedPreferenceData(format!(r#""{}" is not a student id"#, word)),
        )
    })
}

impl PreferencesReader {
    /// Reads a [PreferenceGraph].
    ///
    /// # Example
    ///
    /// ```
    /// # use tcpc::io::PreferencesReader;
    /// let graph = PreferencesReader::default()
    ///     .read(&mut "7\n1 2\n2 1\n".as_bytes())
    ///     .unwrap();
    /// assert_eq!(7, graph.n_students());
    /// assert!(graph.prefers(2, 1));
    /// ```
    pub fn read(&self, reader: &mut dyn Read) -> Result<PreferenceGraph> {
        let br = BufReader::new(reader);
        let mut graph: Option<PreferenceGraph> = None;
        let mut seen = vec![];
        for (i, line) in br.lines().enumerate() {
            let line_number = i + 1;
            let l = line.with_context(|| format!("while reading line {}", line_number))?;
            let words = l.split_whitespace().collect::<Vec<&str>>();
            if words.is_empty() {
                continue;
            }
            let g = match graph.as_mut() {
                Some(g) => g,
                None => {
                    if words.len() != 1 {
                        return Err(malformed_at_line(
                            line_number,
                            TcpcError::MalformedPreferenceData(format!(
                                "expected the number of students, got {} words",
                                words.len()
                            )),
                        ));
                    }
                    let n_students = parse_id(line_number, words[0])?;
                    if n_students > MAX_STUDENTS {
                        return Err(malformed_at_line(
                            line_number,
                            TcpcError::MalformedPreferenceData(format!(
                                "{} students exceed the maximum of {}",
                                n_students, MAX_STUDENTS
                            )),
                        ));
                    }
                    seen = vec![false; n_students];
                    graph = Some(PreferenceGraph::new(n_students));
                    continue;
                }
            };
            let ids = words
                .iter()
                .map(|w| parse_id(line_number, w))
                .collect::<Result<Vec<Student>>>()?;
            g.set_preferences(ids[0], &ids[1..])
                .map_err(|e| malformed_at_line(line_number, e))?;
            if std::mem::replace(&mut seen[ids[0] - 1], true) {
                return Err(malformed_at_line(
                    line_number,
                    TcpcError::MalformedPreferenceData(format!(
                        "preferences of student {} are given more than once",
                        ids[0]
                    )),
                ));
            }
        }
        graph.ok_or_else(|| {
            anyhow!(TcpcError::MalformedPreferenceData(
                "missing number of students".to_string()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(content: &str) -> Result<PreferenceGraph> {
        PreferencesReader::default().read(&mut content.as_bytes())
    }

    fn error_message(content: &str) -> String {
        match read(content).unwrap_err().downcast::<TcpcError>() {
            Ok(TcpcError::MalformedPreferenceData(msg)) => msg,
            r => panic!("unexpected error {:?}", r),
        }
    }

    #[test]
    fn test_ok() {
        let graph = read("7\n1 2\n2 1\n\n5 6 7\n").unwrap();
        assert_eq!(7, graph.n_students());
        assert_eq!(&[2], graph.preferences_of(1));
        assert_eq!(&[6, 7], graph.preferences_of(5));
        assert!(graph.preferences_of(7).is_empty());
        assert_eq!(4, graph.n_preferences());
    }

    #[test]
    fn test_leading_blank_lines_and_spaces() {
        let graph = read("\n  7  \n 3\t4 \n").unwrap();
        assert!(graph.prefers(3, 4));
        assert!(graph.preferences_of(3).len() == 1);
    }

    #[test]
    fn test_student_without_preferences() {
        let graph = read("7\n3\n").unwrap();
        assert!(graph.preferences_of(3).is_empty());
    }

    #[test]
    fn test_empty() {
        assert_eq!("missing number of students", error_message(""));
        assert_eq!("missing number of students", error_message("\n \n"));
    }

    #[test]
    fn test_not_an_integer() {
        assert_eq!(r#"line 2: "b" is not a student id"#, error_message("7\n1 b\n"));
        assert_eq!(r#"line 1: "-7" is not a student id"#, error_message("-7\n"));
    }

    #[test]
    fn test_too_many_students() {
        assert_eq!(
            "line 1: 4294967296 students exceed the maximum of 1000",
            error_message("4294967296\n1 2\n")
        );
        assert_eq!(
            "line 2: 1001 students exceed the maximum of 1000",
            error_message("\n1001\n")
        );
        assert_eq!(MAX_STUDENTS, read("1000\n1000 1\n").unwrap().n_students());
    }

    #[test]
    fn test_bad_preamble() {
        assert_eq!(
            "line 1: expected the number of students, got 2 words",
            error_message("7 1\n")
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            "line 3: student id 8 is out of range [1, 7]",
            error_message("7\n1 2\n2 8\n")
        );
    }

    #[test]
    fn test_self_reference() {
        assert_eq!(
            "line 2: student 1 lists themself as a preference",
            error_message("7\n1 1\n")
        );
    }

    #[test]
    fn test_duplicate_preference() {
        assert_eq!(
            "line 2: student 1 lists student 2 more than once",
            error_message("7\n1 2 2\n")
        );
    }

    #[test]
    fn test_student_given_twice() {
        assert_eq!(
            "line 3: preferences of student 1 are given more than once",
            error_message("7\n1 2\n1 3\n")
        );
    }
}
