use super::{arg, FunctionError};

/// Months covered by the weight-for-age tables.
const MAX_AGE_MONTHS: usize = 60;

/// Reported for weights outside the -3 SD..+3 SD lines.
const BEYOND_TABLE: f64 = 3.5;

/// WHO weight-for-age (kg) at -3, -2, -1, 0, +1, +2, +3 SD, by age in months.
#[rustfmt::skip]
const WFA_GIRLS: [[f64; 7]; MAX_AGE_MONTHS + 1] = [
    [2.0, 2.4, 2.8, 3.2, 3.7, 4.2, 4.8],
    [2.7, 3.2, 3.6, 4.2, 4.8, 5.5, 6.2],
    [3.4, 3.9, 4.5, 5.1, 5.8, 6.6, 7.5],
    [4.0, 4.5, 5.2, 5.8, 6.6, 7.5, 8.5],
    [4.4, 5.0, 5.7, 6.4, 7.3, 8.2, 9.3],
    [4.8, 5.4, 6.1, 6.9, 7.8, 8.8, 10.0],
    [5.1, 5.7, 6.5, 7.3, 8.2, 9.3, 10.6],
    [5.3, 6.0, 6.8, 7.6, 8.6, 9.8, 11.1],
    [5.6, 6.3, 7.0, 7.9, 9.0, 10.2, 11.6],
    [5.8, 6.5, 7.3, 8.2, 9.3, 10.5, 12.0],
    [5.9, 6.7, 7.5, 8.5, 9.6, 10.9, 12.4],
    [6.1, 6.9, 7.7, 8.7, 9.9, 11.2, 12.8],
    [6.3, 7.0, 7.9, 8.9, 10.1, 11.5, 13.1],
    [6.4, 7.2, 8.1, 9.2, 10.4, 11.8, 13.5],
    [6.6, 7.4, 8.3, 9.4, 10.6, 12.1, 13.8],
    [6.7, 7.6, 8.5, 9.6, 10.9, 12.4, 14.1],
    [6.9, 7.7, 8.7, 9.8, 11.1, 12.6, 14.5],
    [7.0, 7.9, 8.9, 10.0, 11.4, 12.9, 14.8],
    [7.2, 8.1, 9.1, 10.2, 11.6, 13.2, 15.1],
    [7.3, 8.2, 9.2, 10.4, 11.8, 13.5, 15.4],
    [7.5, 8.4, 9.4, 10.6, 12.1, 13.7, 15.7],
    [7.6, 8.6, 9.6, 10.9, 12.3, 14.0, 16.0],
    [7.8, 8.7, 9.8, 11.1, 12.5, 14.3, 16.4],
    [7.9, 8.9, 10.0, 11.3, 12.8, 14.6, 16.7],
    [8.1, 9.0, 10.2, 11.5, 13.0, 14.8, 17.0],
    [8.2, 9.2, 10.3, 11.7, 13.3, 15.1, 17.3],
    [8.4, 9.4, 10.5, 11.9, 13.5, 15.4, 17.7],
    [8.5, 9.5, 10.7, 12.1, 13.7, 15.7, 18.0],
    [8.6, 9.7, 10.9, 12.3, 14.0, 16.0, 18.3],
    [8.8, 9.8, 11.1, 12.5, 14.2, 16.2, 18.7],
    [8.9, 10.0, 11.2, 12.7, 14.4, 16.5, 19.0],
    [9.0, 10.1, 11.4, 12.9, 14.7, 16.8, 19.3],
    [9.1, 10.3, 11.6, 13.1, 14.9, 17.1, 19.6],
    [9.3, 10.4, 11.7, 13.3, 15.1, 17.3, 20.0],
    [9.4, 10.5, 11.9, 13.5, 15.4, 17.6, 20.3],
    [9.5, 10.7, 12.0, 13.7, 15.6, 17.9, 20.6],
    [9.6, 10.8, 12.2, 13.9, 15.8, 18.1, 20.9],
    [9.7, 10.9, 12.4, 14.0, 16.0, 18.4, 21.3],
    [9.8, 11.1, 12.5, 14.2, 16.3, 18.7, 21.6],
    [9.9, 11.2, 12.7, 14.4, 16.5, 19.0, 22.0],
    [10.1, 11.3, 12.8, 14.6, 16.7, 19.2, 22.3],
    [10.2, 11.5, 13.0, 14.8, 16.9, 19.5, 22.7],
    [10.3, 11.6, 13.1, 15.0, 17.2, 19.8, 23.0],
    [10.4, 11.7, 13.3, 15.2, 17.4, 20.1, 23.4],
    [10.5, 11.8, 13.4, 15.3, 17.6, 20.4, 23.7],
    [10.6, 12.0, 13.6, 15.5, 17.8, 20.7, 24.1],
    [10.7, 12.1, 13.7, 15.7, 18.1, 20.9, 24.5],
    [10.8, 12.2, 13.9, 15.9, 18.3, 21.2, 24.8],
    [10.9, 12.3, 14.0, 16.1, 18.5, 21.5, 25.2],
    [11.0, 12.4, 14.2, 16.3, 18.8, 21.8, 25.5],
    [11.1, 12.6, 14.3, 16.4, 19.0, 22.1, 25.9],
    [11.2, 12.7, 14.5, 16.6, 19.2, 22.4, 26.3],
    [11.3, 12.8, 14.6, 16.8, 19.4, 22.6, 26.6],
    [11.4, 12.9, 14.8, 17.0, 19.7, 22.9, 27.0],
    [11.5, 13.0, 14.9, 17.2, 19.9, 23.2, 27.4],
    [11.6, 13.2, 15.1, 17.3, 20.1, 23.5, 27.7],
    [11.7, 13.3, 15.2, 17.5, 20.3, 23.8, 28.1],
    [11.8, 13.4, 15.3, 17.7, 20.6, 24.1, 28.5],
    [11.9, 13.5, 15.5, 17.9, 20.8, 24.4, 28.8],
    [12.0, 13.6, 15.6, 18.0, 21.0, 24.6, 29.2],
    [12.1, 13.7, 15.8, 18.2, 21.2, 24.9, 29.5],
];

#[rustfmt::skip]
const WFA_BOYS: [[f64; 7]; MAX_AGE_MONTHS + 1] = [
    [2.1, 2.5, 2.9, 3.3, 3.9, 4.4, 5.0],
    [2.9, 3.4, 3.9, 4.5, 5.1, 5.8, 6.6],
    [3.8, 4.3, 4.9, 5.6, 6.3, 7.1, 8.0],
    [4.4, 5.0, 5.7, 6.4, 7.2, 8.0, 9.0],
    [4.9, 5.6, 6.2, 7.0, 7.8, 8.7, 9.7],
    [5.3, 6.0, 6.7, 7.5, 8.4, 9.3, 10.4],
    [5.7, 6.4, 7.1, 7.9, 8.8, 9.8, 10.9],
    [5.9, 6.7, 7.4, 8.3, 9.2, 10.3, 11.4],
    [6.2, 6.9, 7.7, 8.6, 9.6, 10.7, 11.9],
    [6.4, 7.1, 8.0, 8.9, 9.9, 11.0, 12.3],
    [6.6, 7.4, 8.2, 9.2, 10.2, 11.4, 12.7],
    [6.8, 7.6, 8.4, 9.4, 10.5, 11.7, 13.0],
    [6.9, 7.7, 8.6, 9.6, 10.8, 12.0, 13.3],
    [7.1, 7.9, 8.8, 9.9, 11.0, 12.3, 13.7],
    [7.2, 8.1, 9.0, 10.1, 11.3, 12.6, 14.0],
    [7.4, 8.3, 9.2, 10.3, 11.5, 12.8, 14.3],
    [7.5, 8.4, 9.4, 10.5, 11.7, 13.1, 14.6],
    [7.7, 8.6, 9.6, 10.7, 12.0, 13.4, 14.9],
    [7.8, 8.8, 9.8, 10.9, 12.2, 13.7, 15.3],
    [8.0, 8.9, 10.0, 11.1, 12.5, 13.9, 15.6],
    [8.1, 9.1, 10.1, 11.3, 12.7, 14.2, 15.9],
    [8.2, 9.2, 10.3, 11.5, 12.9, 14.5, 16.2],
    [8.4, 9.4, 10.5, 11.8, 13.2, 14.7, 16.5],
    [8.5, 9.5, 10.7, 12.0, 13.4, 15.0, 16.8],
    [8.6, 9.7, 10.8, 12.2, 13.6, 15.3, 17.1],
    [8.8, 9.8, 11.0, 12.4, 13.9, 15.5, 17.5],
    [8.9, 10.0, 11.2, 12.5, 14.1, 15.8, 17.8],
    [9.0, 10.1, 11.3, 12.7, 14.3, 16.1, 18.1],
    [9.1, 10.2, 11.5, 12.9, 14.5, 16.3, 18.4],
    [9.2, 10.4, 11.7, 13.1, 14.8, 16.6, 18.7],
    [9.4, 10.5, 11.8, 13.3, 15.0, 16.9, 19.0],
    [9.5, 10.7, 12.0, 13.5, 15.2, 17.1, 19.3],
    [9.6, 10.8, 12.1, 13.7, 15.4, 17.4, 19.6],
    [9.7, 10.9, 12.3, 13.8, 15.6, 17.6, 19.9],
    [9.8, 11.0, 12.4, 14.0, 15.8, 17.8, 20.2],
    [9.9, 11.2, 12.6, 14.2, 16.0, 18.1, 20.4],
    [10.0, 11.3, 12.7, 14.3, 16.2, 18.3, 20.7],
    [10.1, 11.4, 12.9, 14.5, 16.4, 18.6, 21.0],
    [10.2, 11.5, 13.0, 14.7, 16.6, 18.8, 21.3],
    [10.3, 11.6, 13.1, 14.8, 16.8, 19.0, 21.6],
    [10.4, 11.8, 13.3, 15.0, 17.0, 19.3, 21.9],
    [10.5, 11.9, 13.4, 15.2, 17.2, 19.5, 22.1],
    [10.6, 12.0, 13.6, 15.3, 17.4, 19.7, 22.4],
    [10.7, 12.1, 13.7, 15.5, 17.6, 20.0, 22.7],
    [10.8, 12.2, 13.8, 15.7, 17.8, 20.2, 23.0],
    [10.9, 12.4, 14.0, 15.8, 18.0, 20.5, 23.3],
    [11.0, 12.5, 14.1, 16.0, 18.2, 20.7, 23.6],
    [11.1, 12.6, 14.3, 16.2, 18.4, 20.9, 23.9],
    [11.2, 12.7, 14.4, 16.3, 18.6, 21.2, 24.2],
    [11.3, 12.8, 14.5, 16.5, 18.8, 21.4, 24.5],
    [11.4, 12.9, 14.7, 16.7, 19.0, 21.7, 24.8],
    [11.5, 13.1, 14.8, 16.8, 19.2, 21.9, 25.1],
    [11.6, 13.2, 15.0, 17.0, 19.4, 22.2, 25.4],
    [11.7, 13.3, 15.1, 17.2, 19.6, 22.4, 25.7],
    [11.8, 13.4, 15.2, 17.3, 19.8, 22.7, 26.0],
    [11.9, 13.5, 15.4, 17.5, 20.0, 22.9, 26.3],
    [12.0, 13.6, 15.5, 17.7, 20.2, 23.2, 26.6],
    [12.1, 13.7, 15.6, 17.8, 20.4, 23.4, 26.9],
    [12.2, 13.8, 15.8, 18.0, 20.6, 23.7, 27.2],
    [12.3, 14.0, 15.9, 18.2, 20.8, 23.9, 27.6],
    [12.4, 14.1, 16.0, 18.3, 21.0, 24.2, 27.9],
];

fn invalid(function: &'static str, message: String) -> FunctionError {
    FunctionError::InvalidArgument { function, message }
}

/// Whole months in `0..=60`.
fn parse_age(function: &'static str, raw: &str) -> Result<usize, FunctionError> {
    raw.parse::<f64>()
        .ok()
        .filter(|months| months.fract() == 0.0 && (0.0..=MAX_AGE_MONTHS as f64).contains(months))
        .map(|months| months as usize)
        .ok_or_else(|| invalid(function, format!("age has to be whole months 0-60, got '{raw}'")))
}

fn parse_weight(function: &'static str, raw: &str) -> Result<f64, FunctionError> {
    raw.parse::<f64>()
        .ok()
        .filter(|kg| kg.is_finite())
        .ok_or_else(|| invalid(function, format!("weight has to be a number, got '{raw}'")))
}

/// `1` selects the girls' table, `0` the boys'.
fn parse_gender(
    function: &'static str,
    raw: &str,
) -> Result<&'static [[f64; 7]; MAX_AGE_MONTHS + 1], FunctionError> {
    match raw {
        "1" => Ok(&WFA_GIRLS),
        "0" => Ok(&WFA_BOYS),
        other => Err(invalid(function, format!("gender has to be 0 or 1, got '{other}'"))),
    }
}

/// Weight-for-age z-score from age in months, weight in kg and gender.
///
/// A weight on one of the SD lines yields that whole SD (`"1"`, `"-2"`).
/// Between two lines the score is interpolated linearly and rendered with
/// two decimals. Outside the -3..+3 lines the score saturates at `"3.5"` or
/// `"-3.5"`.
pub(super) fn z_score_wfa(
    function: &'static str,
    args: &[Option<String>],
) -> Result<String, FunctionError> {
    let age = parse_age(function, arg(args, 0))?;
    let weight = parse_weight(function, arg(args, 1))?;
    let table = parse_gender(function, arg(args, 2))?;
    Ok(z_score(&table[age], weight))
}

fn z_score(lines: &[f64; 7], weight: f64) -> String {
    if let Some(i) = lines.iter().position(|&line| line == weight) {
        return (i as i32 - 3).to_string();
    }
    if weight > lines[6] {
        return BEYOND_TABLE.to_string();
    }
    if weight < lines[0] {
        return (-BEYOND_TABLE).to_string();
    }
    let mut score = 0.0;
    for (i, pair) in lines.windows(2).enumerate() {
        if weight > pair[0] && weight < pair[1] {
            score = (i as f64 - 3.0) + (weight - pair[0]) / (pair[1] - pair[0]);
            break;
        }
    }
    format!("{score:.2}")
}
