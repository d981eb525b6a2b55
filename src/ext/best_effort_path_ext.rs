use std::path::Path;

/// Renders `path` the way it should appear in diagnostics: canonical when the
/// target exists, otherwise made absolute against the current directory, and
/// as written if even that fails.
pub fn best_effort_path_display(path: &Path) -> String {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl<P> BestEffortPathExt for P
where
    P: AsRef<Path> + ?Sized,
{
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self.as_ref())
    }
}
