//! Plain-text dump of a solution list.
//!
//! Two parallel files with one row per solution and no header: the
//! variables file (VAR) and the objectives file (FUN). Row `i` of both files
//! describes the same solution.

use crate::error::EvoResult;
use crate::solution::Solution;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Text form of a decision variable in the VAR file.
pub trait VariableFormat {
    fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()>;
}

macro_rules! display_format {
    ($($t:ty),*) => {
        $(
            impl VariableFormat for $t {
                fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
                    write!(out, "{}", self)
                }
            }
        )*
    };
}

display_format!(f64, f32, i32, i64, u32, u64, usize, char);

impl VariableFormat for bool {
    fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(if *self { b"1" } else { b"0" })
    }
}

/// Writes VAR and FUN files.
///
/// # Examples
///
/// ```
/// use u_evo::{Solution, SolutionListOutput};
///
/// let mut s = Solution::new(vec![0.5, 1.5], 2, 0);
/// s.set_objective(0, 1.0);
/// s.set_objective(1, 2.0);
///
/// let mut fun = Vec::new();
/// SolutionListOutput::new()
///     .write_objectives(&[s], &mut fun)
///     .unwrap();
/// assert_eq!(String::from_utf8(fun).unwrap(), "1\t2\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionListOutput {
    separator: String,
    feasible_only: bool,
}

impl Default for SolutionListOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl SolutionListOutput {
    /// Tab-separated output of every solution.
    pub fn new() -> Self {
        Self {
            separator: "\t".into(),
            feasible_only: false,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Skips solutions that violate a constraint.
    pub fn feasible_only(mut self, enabled: bool) -> Self {
        self.feasible_only = enabled;
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn rows<'a, V>(&self, solutions: &'a [Solution<V>]) -> impl Iterator<Item = &'a Solution<V>> {
        let feasible_only = self.feasible_only;
        solutions
            .iter()
            .filter(move |s| !feasible_only || s.is_feasible())
    }

    /// Writes one row of variables per solution.
    pub fn write_variables<V, W>(&self, solutions: &[Solution<V>], out: W) -> EvoResult<()>
    where
        V: VariableFormat,
        W: Write,
    {
        let mut out = BufWriter::new(out);
        for solution in self.rows(solutions) {
            for (j, v) in solution.variables().iter().enumerate() {
                if j > 0 {
                    out.write_all(self.separator.as_bytes())?;
                }
                v.write_to(&mut out)?;
            }
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes one row of objective values per solution.
    pub fn write_objectives<V, W: Write>(
        &self,
        solutions: &[Solution<V>],
        out: W,
    ) -> EvoResult<()> {
        let mut out = BufWriter::new(out);
        for solution in self.rows(solutions) {
            for (j, v) in solution.objectives().iter().enumerate() {
                if j > 0 {
                    out.write_all(self.separator.as_bytes())?;
                }
                write!(out, "{v}")?;
            }
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Creates (or truncates) both files and writes them.
    ///
    /// # Errors
    /// [`EvoError::Io`](crate::EvoError::Io) if a file cannot be created or
    /// written.
    pub fn print<V: VariableFormat>(
        &self,
        solutions: &[Solution<V>],
        var_path: impl AsRef<Path>,
        fun_path: impl AsRef<Path>,
    ) -> EvoResult<()> {
        self.write_variables(solutions, File::create(var_path)?)?;
        self.write_objectives(solutions, File::create(fun_path)?)?;
        log::debug!("wrote {} solutions to VAR/FUN files", solutions.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluated<V>(vars: Vec<V>, objectives: &[f64]) -> Solution<V> {
        let mut s = Solution::new(vars, objectives.len(), 1);
        s.objectives_mut().copy_from_slice(objectives);
        s
    }

    #[test]
    fn test_variables_and_objectives_rows() {
        let solutions = vec![
            evaluated(vec![0.25, -1.0], &[1.0, 2.5]),
            evaluated(vec![3.0, 4.5], &[0.0, -7.0]),
        ];
        let output = SolutionListOutput::new();

        let mut var = Vec::new();
        output.write_variables(&solutions, &mut var).unwrap();
        assert_eq!(String::from_utf8(var).unwrap(), "0.25\t-1\n3\t4.5\n");

        let mut fun = Vec::new();
        output.write_objectives(&solutions, &mut fun).unwrap();
        assert_eq!(String::from_utf8(fun).unwrap(), "1\t2.5\n0\t-7\n");
    }

    #[test]
    fn test_bool_and_custom_separator() {
        let solutions = vec![evaluated(vec![true, false, true], &[-2.0])];
        let mut var = Vec::new();
        SolutionListOutput::new()
            .with_separator(",")
            .write_variables(&solutions, &mut var)
            .unwrap();
        assert_eq!(String::from_utf8(var).unwrap(), "1,0,1\n");
    }

    #[test]
    fn test_feasible_only() {
        let mut infeasible = evaluated(vec![1usize], &[5.0]);
        infeasible.set_constraint(0, -0.5);
        let solutions = vec![evaluated(vec![0usize], &[1.0]), infeasible];

        let mut fun = Vec::new();
        SolutionListOutput::new()
            .feasible_only(true)
            .write_objectives(&solutions, &mut fun)
            .unwrap();
        assert_eq!(String::from_utf8(fun).unwrap(), "1\n");
    }

    #[test]
    fn test_empty_list_writes_nothing() {
        let mut fun = Vec::new();
        SolutionListOutput::new()
            .write_objectives::<f64, _>(&[], &mut fun)
            .unwrap();
        assert!(fun.is_empty());
    }

    #[test]
    fn test_print_creates_files() {
        let dir = std::env::temp_dir().join(format!("u-evo-output-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let var_path = dir.join("VAR.tsv");
        let fun_path = dir.join("FUN.tsv");

        let solutions = vec![evaluated(vec!['a', 'b'], &[1.0, 2.0])];
        SolutionListOutput::new()
            .print(&solutions, &var_path, &fun_path)
            .unwrap();

        assert_eq!(std::fs::read_to_string(&var_path).unwrap(), "a\tb\n");
        assert_eq!(std::fs::read_to_string(&fun_path).unwrap(), "1\t2\n");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_print_to_missing_directory_fails() {
        let missing = std::env::temp_dir().join("u-evo-no-such-dir/nested/VAR");
        let err = SolutionListOutput::new()
            .print(&[evaluated(vec![1.0], &[1.0])], &missing, &missing)
            .unwrap_err();
        assert!(matches!(err, crate::EvoError::Io(_)));
    }
}
