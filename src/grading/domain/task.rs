//! Task test layout and test-group assignment.

use super::{GradingDomainError, TaskSpec, TestSpec};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Identifier of a test group within a task.
///
/// Declared groups are numbered by their position in the task's group list.
/// Tests not claimed by any declared group fall into one trailing implicit
/// group whose identifier equals the number of declared groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(u32);

impl GroupId {
    /// Creates a group identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTest {
    /// Test identifier.
    pub spec: TestSpec,
    /// Input fed to the program.
    #[serde(default)]
    pub input_data: String,
    /// Expected output or expected text answer.
    pub output_data: String,
}

impl TaskTest {
    /// Creates a test case.
    #[must_use]
    pub fn new(
        spec: TestSpec,
        input_data: impl Into<String>,
        output_data: impl Into<String>,
    ) -> Self {
        Self {
            spec,
            input_data: input_data.into(),
            output_data: output_data.into(),
        }
    }
}

/// A declared group of tests, addressed by zero-based test index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestGroup {
    /// Zero-based indices into the task's test list.
    pub tests: Vec<usize>,
}

impl TestGroup {
    /// Creates a group from test indices.
    #[must_use]
    pub fn new(tests: impl IntoIterator<Item = usize>) -> Self {
        Self {
            tests: tests.into_iter().collect(),
        }
    }
}

/// Test and group metadata of a task, as projected for grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLayout {
    /// Task identifier.
    pub spec: TaskSpec,
    /// Every test of the task, in task order.
    pub tests: Vec<TestSpec>,
    /// Declared test groups.
    #[serde(default)]
    pub test_groups: Vec<TestGroup>,
}

impl TaskLayout {
    /// Maps every task test index to its group.
    ///
    /// The returned sequence has one entry per task test.
    ///
    /// # Errors
    ///
    /// Returns [`GradingDomainError::TestGroupOutOfRange`] when a group
    /// references a missing test, or
    /// [`GradingDomainError::OverlappingTestGroups`] when two groups claim the
    /// same test.
    pub fn group_assignment(&self) -> Result<Vec<GroupId>, GradingDomainError> {
        let total = self.tests.len();
        let implicit = GroupId::new(group_number(self.test_groups.len()));
        let mut assignment: Vec<Option<GroupId>> = vec![None; total];

        for (position, group) in self.test_groups.iter().enumerate() {
            let group_id = GroupId::new(group_number(position));
            for &index in &group.tests {
                let slot = assignment.get_mut(index).ok_or(
                    GradingDomainError::TestGroupOutOfRange {
                        group: group_id.value(),
                        index,
                        total,
                    },
                )?;
                if slot.is_some() {
                    return Err(GradingDomainError::OverlappingTestGroups { index });
                }
                *slot = Some(group_id);
            }
        }

        Ok(assignment
            .into_iter()
            .map(|slot| slot.unwrap_or(implicit))
            .collect())
    }

    /// Returns the group of each graded test, aligned with `graded`.
    ///
    /// A graded test missing from the layout falls into the implicit
    /// trailing group.
    ///
    /// # Errors
    ///
    /// Returns any error from [`TaskLayout::group_assignment`].
    pub fn groups_for(&self, graded: &[TaskTest]) -> Result<Vec<GroupId>, GradingDomainError> {
        let assignment = self.group_assignment()?;
        let implicit = GroupId::new(group_number(self.test_groups.len()));
        let positions: HashMap<&TestSpec, GroupId> =
            self.tests.iter().zip(assignment.iter().copied()).collect();

        Ok(graded
            .iter()
            .map(|test| positions.get(&test.spec).copied().unwrap_or(implicit))
            .collect())
    }
}

fn group_number(position: usize) -> u32 {
    u32::try_from(position).unwrap_or(u32::MAX)
}

/// Graded tests bucketed by group, groups ordered by identifier and tests
/// kept in result order inside each group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedTests(Vec<Vec<TaskTest>>);

impl GroupedTests {
    /// Buckets `tests` by the aligned `groups` sequence.
    ///
    /// Extra entries in the longer of the two inputs are ignored.
    #[must_use]
    pub fn from_aligned(tests: &[TaskTest], groups: &[GroupId]) -> Self {
        let mut buckets: BTreeMap<GroupId, Vec<TaskTest>> = BTreeMap::new();
        for (test, group) in tests.iter().zip(groups) {
            buckets.entry(*group).or_default().push(test.clone());
        }
        Self(buckets.into_values().collect())
    }

    /// Returns the groups as slices.
    #[must_use]
    pub fn groups(&self) -> &[Vec<TaskTest>] {
        &self.0
    }

    /// Returns the total number of tests across all groups.
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }
}
