//! Error-count extraction from analyzer logs.

/// Extract the error count between `start` and `end` in `log`.
///
/// Empty logs count as zero errors. The end marker is searched after the
/// start marker, and thousands separators are accepted (`1,024`).
pub fn count_errors(log: &str, start: &str, end: &str) -> Result<u64, String> {
    if log.is_empty() {
        return Ok(0);
    }

    let begin = log
        .find(start)
        .map(|i| i + start.len())
        .ok_or_else(|| format!("marker {:?} not found", start))?;
    let len = log[begin..]
        .find(end)
        .ok_or_else(|| format!("marker {:?} not found after {:?}", end, start))?;

    let raw = log[begin..begin + len].trim();
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    digits
        .parse::<u64>()
        .map_err(|_| format!("{:?} is not an error count", raw))
}
