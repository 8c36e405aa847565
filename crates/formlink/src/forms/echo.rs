//! Round-trip self-test of the host/dialog channel.

use param_tree::ParameterTree;

use super::{FormResponse, FormResult};
use crate::FormError;

pub(crate) fn run(request: &ParameterTree) -> Result<FormResponse, FormError> {
    Ok(FormResponse::new(FormResult::Ok, request.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_returns_the_request_as_payload() {
        let mut request = ParameterTree::new();
        request.set_int_attribute("key0", 1804289383);
        request
            .new_child("sublist_key0")
            .set_text("    \n    MainOptionText\n    ");
        let response = run(&request).unwrap();
        assert_eq!(response.result, FormResult::Ok);
        assert_eq!(response.payload, request);
    }
}
