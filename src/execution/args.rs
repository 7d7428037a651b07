// Argument list for `go test`

use crate::stream::LineFormat;

/// Flag that hands the remaining arguments to the test binary
const TEST_BINARY_ARGS: [&str; 2] = ["-args", "--args"];

/// Build `test <caller args> -v [-json]`.
///
/// `-v` and `-json` are only added when the caller did not pass them. Added
/// flags go before `-args`, since everything after it belongs to the test
/// binary rather than to `go test`.
pub fn test_args(caller_args: &[String], format: LineFormat) -> Vec<String> {
    let split = caller_args
        .iter()
        .position(|arg| TEST_BINARY_ARGS.contains(&arg.as_str()))
        .unwrap_or(caller_args.len());
    let (go_args, binary_args) = caller_args.split_at(split);

    let mut args = Vec::with_capacity(caller_args.len() + 3);
    args.push("test".to_string());
    args.extend(go_args.iter().cloned());

    // Required to see one line per finished test
    if !has_flag(go_args, "v") {
        args.push("-v".to_string());
    }
    if format == LineFormat::Json && !has_flag(go_args, "json") {
        args.push("-json".to_string());
    }

    args.extend(binary_args.iter().cloned());
    args
}

/// Whether `name` appears as `-name`, `--name` or `-name=value`
pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| {
        let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            return false;
        };
        flag == name
            || flag
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('='))
    })
}
