use crate::core::{DerivedResult, ValidInputs, Visibility};

pub fn is_rental_project(inputs: &ValidInputs) -> bool {
    inputs.rent > 0.0
}

/// Target price is worth showing while the asking price has not reached it yet.
pub fn show_target_price(inputs: &ValidInputs, result: &DerivedResult) -> bool {
    is_rental_project(inputs) && inputs.price >= result.target_price
}

pub fn is_negotiation_required(inputs: &ValidInputs, result: &DerivedResult) -> bool {
    inputs.price > result.acceptable_price
}

pub fn evaluate(inputs: &ValidInputs, result: &DerivedResult) -> Visibility {
    Visibility {
        is_rental_project: is_rental_project(inputs),
        show_target_price: show_target_price(inputs, result),
        is_negotiation_required: is_negotiation_required(inputs, result),
    }
}
