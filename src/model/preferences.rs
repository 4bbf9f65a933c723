use super::errors::{Result, TcpcError};

/// A student, identified by an integer in `[1, N]`.
pub type Student = usize;

/// The largest number of students a class may have.
pub const MAX_STUDENTS: usize = 1000;

/// The directed preference relation of a class.
///
/// Each student owns an ordered list of the classmates they would like to sit with.
/// The relation is asymmetric in general.
/// Students with no registered list are considered to have an empty one.
///
/// # Example
///
/// ```
/// # use tcpc::model::PreferenceGraph;
/// let mut graph = PreferenceGraph::new(3);
/// graph.set_preferences(1, &[2, 3]).unwrap();
/// assert!(graph.prefers(1, 2));
/// assert!(!graph.prefers(2, 1));
/// assert!(graph.set_preferences(2, &[2]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceGraph {
    n_students: usize,
    preferences: Vec<Vec<Student>>,
}

impl PreferenceGraph {
    /// Builds a preference graph for `n_students` students, none of them having preferences.
    pub fn new(n_students: usize) -> Self {
        Self {
            n_students,
            preferences: vec![vec![]; n_students],
        }
    }

    /// Builds a preference graph from a list of `(student, preferred classmates)` entries.
    ///
    /// Each student may appear at most once in the list.
    pub fn new_with_preferences(n_students: usize, entries: &[(Student, Vec<Student>)]) -> Result<Self> {
        let mut graph = Self::new(n_students);
        let mut seen = vec![false; n_students];
        for (student, preferred) in entries {
            graph.set_preferences(*student, preferred)?;
            if std::mem::replace(&mut seen[*student - 1], true) {
                return Err(TcpcError::MalformedPreferenceData(format!(
                    "preferences of student {} are given more than once",
                    student
                )));
            }
        }
        Ok(graph)
    }

    /// Returns the number of students.
    pub fn n_students(&self) -> usize {
        self.n_students
    }

    /// Sets the preferences of a student, replacing the previous ones.
    ///
    /// Out of range ids, self references and duplicated classmates are rejected.
    pub fn set_preferences(&mut self, student: Student, preferred: &[Student]) -> Result<()> {
        self.check_student(student)?;
        for (i, p) in preferred.iter().enumerate() {
            self.check_student(*p)?;
            if *p == student {
                return Err(TcpcError::MalformedPreferenceData(format!(
                    "student {} lists themself as a preference",
                    student
                )));
            }
            if preferred[..i].contains(p) {
                return Err(TcpcError::MalformedPreferenceData(format!(
                    "student {} lists student {} more than once",
                    student, p
                )));
            }
        }
        self.preferences[student - 1] = preferred.to_vec();
        Ok(())
    }

    fn check_student(&self, student: Student) -> Result<()> {
        if student == 0 || student > self.n_students {
            Err(TcpcError::MalformedPreferenceData(format!(
                "student id {} is out of range [1, {}]",
                student, self.n_students
            )))
        } else {
            Ok(())
        }
    }

    /// Returns the ordered preferences of a student.
    ///
    /// # Panics
    ///
    /// If the student id is out of range.
    pub fn preferences_of(&self, student: Student) -> &[Student] {
        &self.preferences[student - 1]
    }

    /// Returns `true` iff `student` lists `other` among their preferences.
    ///
    /// # Panics
    ///
    /// If `student` is out of range.
    pub fn prefers(&self, student: Student, other: Student) -> bool {
        self.preferences[student - 1].contains(&other)
    }

    /// Returns the number of preference arcs.
    pub fn n_preferences(&self) -> usize {
        self.preferences.iter().map(|p| p.len()).sum()
    }
}
