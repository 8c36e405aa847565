//! Fixed argument layout of a dialog launch.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::forms::FormKind;
use crate::identity::BuildIdentity;
use crate::wire::WireValue;
use crate::FormError;

/// Number of arguments after the program name.
pub const ARGUMENT_COUNT: usize = 5;

/// `[form_tag, request_path, response_path, expected_hash, expected_build_kind]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogArgs {
    /// Dispatch tag, resolved later so an unknown tag is reported as such.
    pub form: String,
    pub request: PathBuf,
    pub response: PathBuf,
    pub expected_hash: String,
    pub expected_kind: String,
}

impl DialogArgs {
    /// Arguments a host passes for `kind`, handshaking with `identity`.
    pub fn new(
        kind: FormKind,
        request: impl Into<PathBuf>,
        response: impl Into<PathBuf>,
        identity: &BuildIdentity,
    ) -> Self {
        Self {
            form: kind.as_str().to_string(),
            request: request.into(),
            response: response.into(),
            expected_hash: identity.content_hash().to_string(),
            expected_kind: identity.kind().as_str().to_string(),
        }
    }

    /// Parse the arguments following the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let [form, request, response, expected_hash, expected_kind]: [OsString; ARGUMENT_COUNT] =
            args.try_into().map_err(|args: Vec<OsString>| {
                FormError::ArgumentCountMismatch {
                    expected: ARGUMENT_COUNT,
                    found: args.len(),
                }
            })?;
        Ok(Self {
            form: form.to_string_lossy().into_owned(),
            request: PathBuf::from(request),
            response: PathBuf::from(response),
            expected_hash: expected_hash.to_string_lossy().into_owned(),
            expected_kind: expected_kind.to_string_lossy().into_owned(),
        })
    }

    /// Argument vector in launch order.
    pub fn to_args(&self) -> Vec<OsString> {
        vec![
            OsString::from(&self.form),
            self.request.clone().into_os_string(),
            self.response.clone().into_os_string(),
            OsString::from(&self.expected_hash),
            OsString::from(&self.expected_kind),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::BuildKind;

    #[test]
    fn parse_accepts_exactly_five_arguments() {
        let args = DialogArgs::parse(["item", "/tmp/in.xml", "/tmp/out.xml", "abc", "debug"])
            .expect("parse");
        assert_eq!(args.form, "item");
        assert_eq!(args.request, PathBuf::from("/tmp/in.xml"));
        assert_eq!(args.response, PathBuf::from("/tmp/out.xml"));
        assert_eq!(args.expected_hash, "abc");
        assert_eq!(args.expected_kind, "debug");
    }

    #[test]
    fn wrong_arity_is_a_clear_error() {
        for count in [0usize, 1, 4, 6] {
            let args = vec!["x"; count];
            match DialogArgs::parse(args) {
                Err(FormError::ArgumentCountMismatch { expected, found }) => {
                    assert_eq!(expected, ARGUMENT_COUNT);
                    assert_eq!(found, count);
                }
                other => panic!("unexpected for {count}: {other:?}"),
            }
        }
    }

    #[test]
    fn to_args_round_trips_through_parse() {
        let identity = BuildIdentity::new("feedbeef", BuildKind::Release);
        let args = DialogArgs::new(FormKind::Redo, "/a/req.xml", "/a/resp.xml", &identity);
        let launched = args.to_args();
        assert_eq!(launched.len(), ARGUMENT_COUNT);
        assert_eq!(launched[0], "redo");
        assert_eq!(launched[3], "feedbeef");
        assert_eq!(launched[4], "release");
        assert_eq!(DialogArgs::parse(launched).unwrap(), args);
    }
}
