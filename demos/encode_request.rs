use std::error::Error;

use formlink::forms::item::{
    BoundaryBoxState, HorizontalAlign, ItemRequest, ItemValues, LatexCode, PlacedOption,
    Placement, VerticalAlign,
};
use formlink::forms::REQUEST_ROOT;
use formlink::FormRequest;

fn main() -> Result<(), Box<dyn Error>> {
    let request = ItemRequest {
        values: ItemValues {
            placement: Placement::new(HorizontalAlign::Left, VerticalAlign::Centre),
            placed_option: PlacedOption::KeepScaleClip,
            latex: LatexCode::new("E=mc^2", 3),
        },
        boundary_box_state: BoundaryBoxState::Absent,
        latex_exists: false,
    };
    let document = param_xml::encode(&request.to_tree(), REQUEST_ROOT)?;
    println!("{document}");

    let decoded = param_xml::decode_expecting(&document, REQUEST_ROOT)?;
    assert_eq!(ItemRequest::from_tree(&decoded)?, request);
    Ok(())
}
