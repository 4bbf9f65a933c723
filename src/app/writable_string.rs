use std::io::Write;

/// A `String` buffer receiving the help messages clap writes, so that they can be sent to the logger.
#[derive(Default)]
pub(crate) struct WritableString(String);

impl WritableString {
    /// Iterates over the lines of the buffer, trailing whitespaces removed.
    pub(crate) fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.lines().map(str::trim_end)
    }
}

impl Write for WritableString {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Display for WritableString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let mut s = WritableString::default();
        write!(s, "USAGE:").unwrap();
        write!(s, " tcpc").unwrap();
        s.flush().unwrap();
        assert_eq!("USAGE: tcpc", s.to_string())
    }

    #[test]
    fn test_lines() {
        let mut s = WritableString::default();
        writeln!(s, "tcpc 0.1.0  ").unwrap();
        writeln!(s).unwrap();
        write!(s, "USAGE:").unwrap();
        assert_eq!(
            vec!["tcpc 0.1.0", "", "USAGE:"],
            s.lines().collect::<Vec<_>>()
        );
    }
}
