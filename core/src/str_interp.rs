use std::{borrow::Borrow, collections::HashMap, hash::Hash};

pub type Result = std::result::Result<String, InterpError>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InterpError {
    #[error("Undefined variable '{0}' at {}", .1+1)]
    UndefinedVar(String, usize),

    #[error("Unclosed braces (found opening braces at {})", .0+1)]
    UnclosedBrace(usize),
}

/// Replaces every `{{name}}` in `fmt` with `variables[name]`.
/// Whitespace around the name is ignored, a single brace is kept as is.
pub fn interp<K, V>(fmt: &str, variables: &HashMap<K, V>) -> Result
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
{
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum State {
        Normal,
        OpenBrace,
        InsideBraces,
        CloseBrace,
    }
    use State::*;

    let mut state = Normal;
    let mut pos_open_brace = 0;
    let mut res = String::with_capacity(fmt.len() * 2);
    let mut var_name = String::with_capacity(32);

    for (i, c) in fmt.chars().enumerate() {
        match (c, state) {
            ('{', Normal) => {
                state = OpenBrace;
                pos_open_brace = i;
            }
            ('{', OpenBrace) => {
                state = InsideBraces;
                var_name.clear();
            }
            (_, OpenBrace) => {
                state = Normal;
                res.push('{');
                res.push(c);
            }
            ('}', InsideBraces) => {
                state = CloseBrace;
            }
            (_, InsideBraces) => {
                var_name.push(c);
            }
            ('}', CloseBrace) => {
                state = Normal;
                let name = var_name.trim();
                let Some(value) = variables.get(name) else {
                    return Err(InterpError::UndefinedVar(name.to_owned(), pos_open_brace + 2))
                };
                res += value.as_ref();
            }
            (_, CloseBrace) => {
                state = InsideBraces;
                var_name.push('}');
                var_name.push(c);
            }
            (_, Normal) => {
                res.push(c);
            }
        }
    }

    match state {
        InsideBraces | CloseBrace => Err(InterpError::UnclosedBrace(pos_open_brace)),
        OpenBrace => {
            res.push('{');
            Ok(res)
        }
        Normal => Ok(res),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn interp_ok() {
        let vars = hashmap! {
            "test_files" => "a_test.rb b_test.rb",
            "solution_files" => "a.pl",
        };

        assert_eq!(interp("mix test", &vars).unwrap(), "mix test");
        assert_eq!(
            interp("ruby {{test_files}}", &vars).unwrap(),
            "ruby a_test.rb b_test.rb"
        );
        assert_eq!(
            interp("swipl -f {{solution_files}} -s {{ test_files }}", &vars).unwrap(),
            "swipl -f a.pl -s a_test.rb b_test.rb"
        );
        assert_eq!(interp("{{solution_files}}{{solution_files}}", &vars).unwrap(), "a.pla.pl");
        assert_eq!(interp("awk '{print $1}'", &vars).unwrap(), "awk '{print $1}'");
        assert_eq!(interp("{", &vars).unwrap(), "{");
        assert_eq!(interp("}}", &vars).unwrap(), "}}");
    }

    #[test]
    fn interp_ng() {
        let vars = hashmap! { "test_files" => "t.rb" };
        assert_eq!(
            interp("run {{solution_files}}", &vars).unwrap_err(),
            InterpError::UndefinedVar("solution_files".to_owned(), 6)
        );
        assert_eq!(
            interp("{{test_files}} {{oops", &vars).unwrap_err(),
            InterpError::UnclosedBrace(15),
        );
    }
}
