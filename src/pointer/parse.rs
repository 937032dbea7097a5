use crate::error::PointerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
struct State {
    current: usize,
}

struct Parser<'input, R> {
    inner: Box<dyn Fn(&'input str, State) -> Result<(R, State), PointerError> + 'input>,
}

fn pat<'input, 'pattern>(p: &'pattern str) -> Parser<'input, &'input str>
where
    'pattern: 'input,
{
    Parser {
        inner: Box::new(move |input: &'input str, state| {
            if input[state.current..].starts_with(p) {
                Ok((
                    &input[state.current..state.current + p.len()],
                    State {
                        current: state.current + p.len(),
                    },
                ))
            } else {
                Err(PointerError::NoParse(state.current))
            }
        }),
    }
}

fn or<'input, R: 'input>(first: Parser<'input, R>, second: Parser<'input, R>) -> Parser<'input, R> {
    Parser {
        inner: Box::new(
            move |input: &'input str, state| match (first.inner)(input, state) {
                Ok(result) => Ok(result),
                Err(_) => (second.inner)(input, state),
            },
        ),
    }
}

// Stops at the first char failing `pred`; the slice may be empty.
fn take_while<'input>(pred: impl Fn(char) -> bool + 'input) -> Parser<'input, &'input str> {
    Parser {
        inner: Box::new(move |input: &'input str, state| {
            let rest = &input[state.current..];
            let end = rest
                .char_indices()
                .find(|(_, c)| !pred(*c))
                .map_or(input.len(), |(index, _)| state.current + index);
            Ok((&input[state.current..end], State { current: end }))
        }),
    }
}

fn bind<'input, R: 'input, RR: 'input>(
    p: Parser<'input, R>,
    f: impl Fn(R) -> Parser<'input, RR> + 'input,
) -> Parser<'input, RR> {
    Parser {
        inner: Box::new(move |input: &'input str, state| {
            let (result, new_state) = (p.inner)(input, state)?;
            (f(result).inner)(input, new_state)
        }),
    }
}

fn success<'input, R: Clone + 'input>(value: R) -> Parser<'input, R> {
    Parser {
        inner: Box::new(move |_: &'input str, state| Ok((value.clone(), state))),
    }
}

fn fail<'input, R: 'input>() -> Parser<'input, R> {
    Parser {
        inner: Box::new(move |_: &'input str, state| Err(PointerError::NoParse(state.current))),
    }
}

// Zero or more; stops on the first failure or when the parser stops consuming input.
fn many<'input, R: 'input>(parser: Parser<'input, R>) -> Parser<'input, Vec<R>> {
    Parser {
        inner: Box::new(move |input: &'input str, mut state| {
            let mut results = Vec::new();
            while let Ok((result, new_state)) = (parser.inner)(input, state) {
                if new_state.current == state.current {
                    break;
                }
                results.push(result);
                state = new_state;
            }
            Ok((results, state))
        }),
    }
}

fn escaped<'input>() -> Parser<'input, &'input str> {
    or(
        bind(pat("~0"), |_: &str| success("~")),
        bind(pat("~1"), |_: &str| success("/")),
    )
}

fn unescaped<'input>() -> Parser<'input, &'input str> {
    bind(take_while(|c| c != '/' && c != '~'), |run| {
        if run.is_empty() { fail() } else { success(run) }
    })
}

fn reference_token<'input>() -> Parser<'input, String> {
    bind(many(or(escaped(), unescaped())), |parts: Vec<&str>| {
        success(parts.concat())
    })
}

fn reference_tokens<'input>() -> Parser<'input, Vec<String>> {
    many(bind(pat("/"), |_: &str| reference_token()))
}

/// Decodes a JSON pointer string (`/a/b~1c`) into its reference tokens.
pub fn parse_pointer(input: &str) -> Result<Vec<String>, PointerError> {
    let (tokens, state) = (reference_tokens().inner)(input, State::default())?;
    if state.current == input.len() {
        Ok(tokens)
    } else {
        Err(PointerError::NoParse(state.current))
    }
}

/// Decodes either form: a URI fragment (`#/a%20b`) or a plain pointer.
pub fn parse_any(input: &str) -> Result<Vec<String>, PointerError> {
    match input.strip_prefix('#') {
        Some(fragment) => parse_pointer(&decode_fragment(fragment)?),
        None => parse_pointer(input),
    }
}

pub fn decode_fragment(fragment: &str) -> Result<String, PointerError> {
    let bytes = fragment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = fragment
                .get(i + 1..i + 3)
                .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or(PointerError::BadEncoding(i))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|e| PointerError::BadEncoding(e.utf8_error().valid_up_to()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // test the pattern function
    #[test]
    fn test_pattern() {
        let parser = pat("/");
        let input = "/foo";
        let state = State { current: 0 };
        let result = (parser.inner)(input, state).unwrap();
        assert_eq!(result, ("/", State { current: 1 }));
    }

    // test the take_while function
    #[test]
    fn test_take_while() {
        let parser = take_while(|c| c != '/');
        let input = "foo/bar";
        let state = State { current: 0 };
        let result = (parser.inner)(input, state).unwrap();
        assert_eq!(result, ("foo", State { current: 3 }));

        let parser = take_while(|c| c != '/');
        let input = "héllo";
        let result = (parser.inner)(input, State::default()).unwrap();
        assert_eq!(result, ("héllo", State { current: input.len() }));
    }

    // test the many function stops without consuming
    #[test]
    fn test_many() {
        let parser = many(pat("ab"));
        let input = "ababx";
        let result = (parser.inner)(input, State::default()).unwrap();
        assert_eq!(result, (vec!["ab", "ab"], State { current: 4 }));

        let parser = many(take_while(|c| c == 'z'));
        let result = (parser.inner)("abc", State::default()).unwrap();
        assert_eq!(result, (Vec::<&str>::new(), State { current: 0 }));
    }

    // test the escape sequences
    #[test]
    fn test_reference_token() {
        let parser = reference_token();
        let input = "a~1b~0c/rest";
        let result = (parser.inner)(input, State::default()).unwrap();
        assert_eq!(result, ("a/b~c".to_string(), State { current: 7 }));
    }

    #[test]
    fn test_parse_pointer() {
        assert_eq!(parse_pointer("").unwrap(), Vec::<String>::new());
        assert_eq!(parse_pointer("/").unwrap(), vec![String::new()]);
        assert_eq!(
            parse_pointer("/a/0/b~1c").unwrap(),
            vec!["a".to_string(), "0".to_string(), "b/c".to_string()]
        );
        assert_eq!(parse_pointer("//x").unwrap(), vec![String::new(), "x".to_string()]);
    }

    #[test]
    fn test_parse_pointer_rejects_malformed() {
        assert_eq!(parse_pointer("a/b").unwrap_err(), PointerError::NoParse(0));
        assert_eq!(parse_pointer("/a~2").unwrap_err(), PointerError::NoParse(2));
        assert_eq!(parse_pointer("/a~").unwrap_err(), PointerError::NoParse(2));
    }

    #[test]
    fn test_decode_fragment() {
        assert_eq!(decode_fragment("/a%20b").unwrap(), "/a b");
        assert_eq!(decode_fragment("/%C3%A9").unwrap(), "/é");
        assert_eq!(decode_fragment("/a%2").unwrap_err(), PointerError::BadEncoding(2));
        assert_eq!(decode_fragment("/%zz").unwrap_err(), PointerError::BadEncoding(1));
        assert!(matches!(decode_fragment("%FF"), Err(PointerError::BadEncoding(_))));
    }

    #[test]
    fn test_parse_any() {
        assert_eq!(
            parse_any("#/a%20b/c~1d").unwrap(),
            vec!["a b".to_string(), "c/d".to_string()]
        );
        assert_eq!(parse_any("#").unwrap(), Vec::<String>::new());
        assert_eq!(parse_any("/x").unwrap(), vec!["x".to_string()]);
    }
}
