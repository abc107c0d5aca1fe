//! Recipes and recursive crafting.
//!
//! Crafting an item whose ingredients are short first tries to craft the
//! missing ingredients, recursively. A dry run on a copy of the inventory
//! decides whether the whole tree succeeds before anything is consumed.

use std::collections::HashSet;

use serde::Serialize;
use terragen_core::{Inventory, InventorySink, TileType};

use crate::error::{GameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeCategory {
    Tools,
    Structures,
    Logic,
    Mechanisms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub output: TileType,
    /// Items produced per craft
    pub count: u32,
    pub category: RecipeCategory,
    pub ingredients: &'static [(TileType, u32)],
}

const fn recipe(
    output: TileType,
    count: u32,
    category: RecipeCategory,
    ingredients: &'static [(TileType, u32)],
) -> Recipe {
    Recipe {
        output,
        count,
        category,
        ingredients,
    }
}

use RecipeCategory::*;
use TileType::*;

/// Every recipe in the game. When two recipes share an output, the first one
/// is used for crafting ingredients.
pub const RECIPES: &[Recipe] = &[
    recipe(Axe, 1, Tools, &[(Wood, 3), (Stone, 2)]),
    recipe(Pickaxe, 1, Tools, &[(Wood, 3), (Stone, 3)]),
    recipe(Wall, 1, Structures, &[(Wood, 2)]),
    recipe(Floor, 1, Structures, &[(Stone, 1)]),
    recipe(Rail, 4, Structures, &[(Wood, 1), (Stone, 1)]),
    recipe(Wire, 2, Logic, &[(Wood, 1), (Sand, 1)]),
    recipe(Lever, 1, Logic, &[(Stone, 1), (Wood, 1)]),
    recipe(Lamp, 1, Logic, &[(Stone, 1), (Wire, 2)]),
    recipe(AndGate, 1, Logic, &[(Stone, 3), (Wire, 2)]),
    recipe(OrGate, 1, Logic, &[(Stone, 3), (Wire, 2)]),
    recipe(NotGate, 1, Logic, &[(Stone, 2), (Wire, 1), (Lamp, 1)]),
    recipe(Minecart, 1, Mechanisms, &[(Stone, 5)]),
    recipe(Robot, 1, Mechanisms, &[(Stone, 5), (Wire, 5), (Lamp, 1)]),
    recipe(Stone, 1, Structures, &[(Sand, 2)]),
    recipe(Sand, 2, Structures, &[(Stone, 1)]),
    recipe(Sand, 1, Structures, &[(Wood, 2)]),
];

/// The recipe used to make `output`
pub fn recipe_for(output: TileType) -> Option<&'static Recipe> {
    RECIPES.iter().find(|r| r.output == output)
}

/// Whether `recipe` can be crafted, counting sub-crafts of missing
/// ingredients. Leaves `inventory` untouched.
pub fn can_craft(recipe: &Recipe, inventory: &Inventory) -> bool {
    let mut scratch = inventory.clone();
    simulate(recipe, &mut scratch, HashSet::new())
}

/// Craft `recipe` once, crafting missing ingredients on the way.
///
/// Nothing is consumed unless the whole tree succeeds.
pub fn craft(recipe: &Recipe, inventory: &mut Inventory) -> Result<()> {
    if !can_craft(recipe, inventory) {
        return Err(GameError::CannotCraft(recipe.output));
    }
    if !simulate(recipe, inventory, HashSet::new()) {
        return Err(GameError::CannotCraft(recipe.output));
    }
    tracing::debug!(item = %recipe.output, count = recipe.count, "crafted");
    Ok(())
}

/// Craft whatever makes `output`.
pub fn craft_item(output: TileType, inventory: &mut Inventory) -> Result<()> {
    let recipe = recipe_for(output).ok_or(GameError::NoRecipe(output))?;
    craft(recipe, inventory)
}

fn simulate(recipe: &Recipe, inventory: &mut Inventory, mut visited: HashSet<TileType>) -> bool {
    if !visited.insert(recipe.output) {
        return false;
    }

    for &(item, needed) in recipe.ingredients {
        let available = inventory.count(item);
        if available < needed {
            let Some(sub) = recipe_for(item) else {
                return false;
            };
            let crafts = (needed - available).div_ceil(sub.count);
            for _ in 0..crafts {
                // Each branch gets its own copy so siblings may reuse a recipe
                if !simulate(sub, inventory, visited.clone()) {
                    return false;
                }
            }
        }
        if inventory.remove(item, needed).is_err() {
            return false;
        }
    }

    inventory.add_item(recipe.output, recipe.count);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(items: &[(TileType, u32)]) -> Inventory {
        items.iter().copied().collect()
    }

    #[test]
    fn test_direct_craft() {
        let mut inv = inventory(&[(Wood, 3), (Stone, 2)]);
        craft_item(Axe, &mut inv).unwrap();
        assert_eq!(inv, inventory(&[(Axe, 1)]));
    }

    #[test]
    fn test_crafts_missing_ingredients() {
        // A lamp needs two wire, which one wood and one sand make
        let mut inv = inventory(&[(Stone, 1), (Wood, 1), (Sand, 1)]);
        assert!(can_craft(recipe_for(Lamp).unwrap(), &inv));
        craft_item(Lamp, &mut inv).unwrap();
        assert_eq!(inv, inventory(&[(Lamp, 1)]));
    }

    #[test]
    fn test_surplus_from_sub_craft_is_kept() {
        let mut inv = inventory(&[(Wood, 3), (Stone, 3), (Sand, 1)]);
        craft_item(Lever, &mut inv).unwrap();
        assert_eq!(inv.count(Lever), 1);
        craft_item(Lamp, &mut inv).unwrap();
        // Both wires come from one sub-craft of wood and sand
        assert_eq!(inv.count(Lamp), 1);
        assert_eq!(inv.count(Wire), 0);
        assert_eq!(inv.count(Wood), 1);
        assert_eq!(inv.count(Stone), 1);
    }

    #[test]
    fn test_failure_consumes_nothing() {
        let mut inv = inventory(&[(Stone, 4), (Wire, 1)]);
        let before = inv.clone();
        let err = craft_item(Robot, &mut inv).unwrap_err();
        assert!(matches!(err, GameError::CannotCraft(Robot)));
        assert_eq!(inv, before);
    }

    #[test]
    fn test_cyclic_recipes_terminate() {
        // Stone needs sand, sand needs stone
        let mut inv = Inventory::new();
        assert!(!can_craft(recipe_for(Stone).unwrap(), &inv));
        assert!(craft_item(Stone, &mut inv).is_err());
    }

    #[test]
    fn test_no_recipe() {
        let mut inv = Inventory::new();
        assert!(matches!(
            craft_item(Grass, &mut inv),
            Err(GameError::NoRecipe(Grass))
        ));
    }

    #[test]
    fn test_first_recipe_wins() {
        assert_eq!(recipe_for(Sand).unwrap().ingredients, &[(Stone, 1)]);
    }
}
