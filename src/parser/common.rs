use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{alpha1, char, multispace0, satisfy},
    combinator::{map, not, recognize, verify},
    sequence::{delimited, pair, terminated},
};

pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Case-insensitive keyword with a word boundary, so `USE` never matches the
/// head of `USERS`.
pub fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    ws(terminated(
        tag_no_case(word),
        not(satisfy(|c: char| c.is_alphanumeric() || c == '_')),
    ))
}

pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            take_while(|c: char| c.is_alphanumeric() || c == '_'),
        )),
        |s: &str| s.to_string(),
    )(input)
}

// Identifier that is not a clause keyword. Keeps WHERE/SET/VALUES/LIKE from
// being swallowed as a table or column name on malformed input.
pub fn non_keyword_identifier(input: &str) -> IResult<&str, String> {
    verify(identifier, |s: &String| {
        let upper = s.to_uppercase();
        !matches!(upper.as_str(), "WHERE" | "SET" | "VALUES" | "LIKE" | "AS")
    })(input)
}

/// A literal value: quoted (single or double, quotes stripped) or a bare
/// token. Case is preserved either way; values are free-form text.
pub fn literal(input: &str) -> IResult<&str, String> {
    alt((
        map(
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            |s: &str| s.to_string(),
        ),
        map(
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            |s: &str| s.to_string(),
        ),
        map(
            take_while1(|c: char| !c.is_whitespace() && !matches!(c, ',' | ')' | ';' | '=')),
            |s: &str| s.to_string(),
        ),
    ))(input)
}
