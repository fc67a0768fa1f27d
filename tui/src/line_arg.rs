use machine_learning::{OriginalLine, parse_input};

/// Parses a `LABEL=SLOPE,INTERCEPT` command line argument, slope and intercept in the
/// dataset's units.
///
/// # Errors
/// A message describing the malformed part, in the shape `clap` value parsers expect.
pub fn parse_plot_line(arg: &str) -> Result<(String, OriginalLine), String> {
    let (label, coefficients) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected LABEL=SLOPE,INTERCEPT, got '{arg}'"))?;

    let label = label.trim();
    if label.is_empty() {
        return Err(format!("missing label in '{arg}'"));
    }

    let (slope, intercept) = coefficients
        .split_once(',')
        .ok_or_else(|| format!("expected SLOPE,INTERCEPT after '=', got '{coefficients}'"))?;

    let slope = parse_input(slope).map_err(|e| e.to_string())?;
    let intercept = parse_input(intercept).map_err(|e| e.to_string())?;

    Ok((label.to_string(), OriginalLine::new(slope, intercept)))
}
