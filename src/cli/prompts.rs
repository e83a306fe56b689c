//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::dashboard::{SelectionError, SessionContext, SlotGroup, COMPARISON_SLOTS};
use crate::utils::{print_step_header, print_warning};

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Pick one option, starting on `current` when it is listed
fn select_one(prompt: &str, options: &[String], current: Option<&str>) -> Result<usize> {
    let default = current
        .and_then(|c| options.iter().position(|o| o == c))
        .unwrap_or(0);
    let index = Select::new()
        .with_prompt(prompt)
        .items(options)
        .default(default)
        .interact()?;
    Ok(index)
}

/// Keep asking until the pick is accepted. Duplicate picks under the
/// distinct policy and out-of-bounds year ranges are retried; other
/// selection errors are returned.
fn until_accepted<F>(mut ask_and_apply: F) -> Result<()>
where
    F: FnMut() -> Result<std::result::Result<(), SelectionError>>,
{
    loop {
        match ask_and_apply()? {
            Ok(()) => return Ok(()),
            Err(
                err @ (SelectionError::DuplicateSelection { .. }
                | SelectionError::InvalidYearRange { .. }),
            ) => {
                print_warning(&format!("{} - try again", err));
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn prompt_slot_group(session: &mut SessionContext, group: SlotGroup, label: &str) -> Result<()> {
    let options = match group {
        SlotGroup::OdometerTypes => session.options().types.clone(),
        _ => session.options().manufacturers.clone(),
    };
    // Slots fill in order, so each index is either taken or the next free one
    for index in 0..COMPARISON_SLOTS.min(options.len()) {
        until_accepted(|| {
            let current = session.slots(group).get(index).cloned();
            let pick = select_one(
                &format!("Select {} {}", label, index + 1),
                &options,
                current.as_deref(),
            )?;
            Ok(session.set_slot(group, index, &options[pick]))
        })?;
    }
    Ok(())
}

fn prompt_condition(session: &mut SessionContext) -> Result<()> {
    let mut options = vec!["All Conditions".to_string()];
    options.extend(session.options().conditions.iter().cloned());

    let current = session.condition().map(str::to_string);
    let pick = select_one("Select Vehicle Condition", &options, current.as_deref())?;
    let condition = (pick > 0).then(|| options[pick].as_str());
    session.set_condition(condition)?;
    Ok(())
}

fn prompt_comparison_pairs(session: &mut SessionContext) -> Result<()> {
    let manufacturers = session.options().manufacturers.clone();
    let types = session.options().types.clone();
    if manufacturers.is_empty() || types.is_empty() {
        return Ok(());
    }
    for index in 0..COMPARISON_SLOTS.min(manufacturers.len() * types.len()) {
        until_accepted(|| {
            let current = session.comparison_pairs().get(index).cloned();
            let maker = select_one(
                &format!("Select Manufacturer {} for Odometer Range Comparison", index + 1),
                &manufacturers,
                current.as_ref().map(|p| p.manufacturer.as_str()),
            )?;
            let vehicle_type = select_one(
                &format!("Select Vehicle Type {} for Manufacturer {}", index + 1, index + 1),
                &types,
                current.as_ref().map(|p| p.vehicle_type.as_str()),
            )?;
            Ok(session.set_comparison_pair(index, &manufacturers[maker], &types[vehicle_type]))
        })?;
    }
    Ok(())
}

fn prompt_model_year(session: &mut SessionContext) -> Result<()> {
    let manufacturers = session.options().manufacturers.clone();
    let types = session.options().types.clone();
    if manufacturers.is_empty() || types.is_empty() {
        return Ok(());
    }
    let (current_maker, current_type) = match session.model_year_subject() {
        Some((m, t)) => (Some(m.to_string()), Some(t.to_string())),
        None => (None, None),
    };
    let maker = select_one(
        "Select Manufacturer for Model Year Comparison",
        &manufacturers,
        current_maker.as_deref(),
    )?;
    let vehicle_type = select_one(
        "Select Vehicle Type for Model Year Comparison",
        &types,
        current_type.as_deref(),
    )?;
    session.set_model_year_subject(&manufacturers[maker], &types[vehicle_type])?;

    let (min, max) = session.options().model_year_bounds;
    until_accepted(|| {
        let (low, high) = session.model_years();
        let low: i32 = Input::new()
            .with_prompt(format!("First model year ({}-{})", min, max))
            .default(low)
            .interact_text()?;
        let high: i32 = Input::new()
            .with_prompt(format!("Last model year ({}-{})", low, max))
            .default(high.max(low))
            .interact_text()?;
        Ok(session.set_model_years(low, high))
    })
}

fn prompt_transmission_types(session: &mut SessionContext) -> Result<()> {
    let types = session.options().types.clone();
    if types.is_empty() {
        return Ok(());
    }
    let defaults: Vec<bool> = types
        .iter()
        .map(|t| session.transmission_types().contains(t))
        .collect();
    let picks = MultiSelect::new()
        .with_prompt("Select Vehicle Types")
        .items(&types)
        .defaults(&defaults)
        .interact()?;
    let selected: Vec<&str> = picks.iter().map(|&i| types[i].as_str()).collect();
    session.set_transmission_types(&selected)?;
    Ok(())
}

/// Walk through every chart's dropdowns, starting from the current picks
pub fn prompt_selections(session: &mut SessionContext) -> Result<()> {
    if !confirm_step("Customize chart selections?")? {
        return Ok(());
    }

    print_step_header(1, "Days Listed by Manufacturer");
    prompt_slot_group(session, SlotGroup::DaysListedManufacturers, "Manufacturer")?;

    print_step_header(2, "Price Distribution by Manufacturer");
    prompt_slot_group(session, SlotGroup::PriceManufacturers, "Manufacturer for Price")?;

    print_step_header(3, "Average Price by Odometer Range and Vehicle Type");
    prompt_slot_group(session, SlotGroup::OdometerTypes, "Vehicle Type")?;

    print_step_header(4, "Price vs. Odometer by Condition");
    prompt_condition(session)?;

    print_step_header(5, "Manufacturer and Vehicle Type Comparison");
    prompt_comparison_pairs(session)?;

    print_step_header(6, "Average Price vs. Model Year");
    prompt_model_year(session)?;

    print_step_header(7, "Average Price by Vehicle Type and Transmission");
    prompt_transmission_types(session)?;

    Ok(())
}
