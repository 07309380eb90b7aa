use std::{collections::BTreeMap, time::Duration};

use sqlx::prelude::FromRow;

use crate::{ExportError, RecipeStore};

/// One ingredient occurrence required by one recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct IngredientLine {
    pub ingredient_name: String,
    pub unit: String,
    pub amount: u32,
}

impl IngredientLine {
    pub fn new(ingredient_name: impl Into<String>, unit: impl Into<String>, amount: u32) -> Self {
        Self {
            ingredient_name: ingredient_name.into(),
            unit: unit.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedIngredient {
    pub ingredient_name: String,
    pub unit: String,
    pub total_amount: u64,
}

impl AggregatedIngredient {
    /// Printed form of the entry, e.g. `Flour, g:   350`.
    pub fn line(&self) -> String {
        format!(
            "{}, {}:   {}",
            self.ingredient_name, self.unit, self.total_amount
        )
    }
}

/// Aggregated ingredients sorted by `(ingredient_name, unit)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList(Vec<AggregatedIngredient>);

impl ShoppingList {
    /// Groups lines on the exact `(ingredient_name, unit)` pair and sums
    /// their amounts. Input order does not matter.
    pub fn aggregate(lines: impl IntoIterator<Item = IngredientLine>) -> Self {
        let mut groups: BTreeMap<(String, String), u64> = BTreeMap::new();

        for line in lines {
            *groups.entry((line.ingredient_name, line.unit)).or_default() +=
                u64::from(line.amount);
        }

        Self(
            groups
                .into_iter()
                .map(|((ingredient_name, unit), total_amount)| AggregatedIngredient {
                    ingredient_name,
                    unit,
                    total_amount,
                })
                .collect(),
        )
    }

    pub fn items(&self) -> &[AggregatedIngredient] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

pub async fn build_shopping_list<S: RecipeStore + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<ShoppingList, ExportError> {
    let lines = store
        .ingredient_lines_for_cart_user(user_id)
        .await
        .map_err(ExportError::DataAccess)?;

    let count = lines.len();
    let list = ShoppingList::aggregate(lines);

    tracing::debug!(user_id, lines = count, items = list.len(), "shopping list built");

    Ok(list)
}

/// Same as [`build_shopping_list`], failing with [`ExportError::Timeout`]
/// when the store read outlives `deadline`.
pub async fn build_shopping_list_within<S: RecipeStore + ?Sized>(
    store: &S,
    user_id: &str,
    deadline: Duration,
) -> Result<ShoppingList, ExportError> {
    match tokio::time::timeout(deadline, build_shopping_list(store, user_id)).await {
        Ok(list) => list,
        Err(_) => {
            tracing::warn!(
                user_id,
                deadline_ms = deadline.as_millis() as u64,
                "shopping cart read timed out"
            );

            Err(ExportError::Timeout)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub struct MemoryStore(pub Vec<IngredientLine>);

    #[async_trait::async_trait]
    impl RecipeStore for MemoryStore {
        async fn ingredient_lines_for_cart_user(
            &self,
            _user_id: &str,
        ) -> anyhow::Result<Vec<IngredientLine>> {
            Ok(self.0.clone())
        }
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl RecipeStore for FailingStore {
        async fn ingredient_lines_for_cart_user(
            &self,
            _user_id: &str,
        ) -> anyhow::Result<Vec<IngredientLine>> {
            anyhow::bail!("database is locked")
        }
    }

    struct SlowStore;

    #[async_trait::async_trait]
    impl RecipeStore for SlowStore {
        async fn ingredient_lines_for_cart_user(
            &self,
            _user_id: &str,
        ) -> anyhow::Result<Vec<IngredientLine>> {
            tokio::time::sleep(Duration::from_secs(5)).await;

            Ok(vec![])
        }
    }

    fn entry(name: &str, unit: &str, total_amount: u64) -> AggregatedIngredient {
        AggregatedIngredient {
            ingredient_name: name.to_owned(),
            unit: unit.to_owned(),
            total_amount,
        }
    }

    #[test]
    fn test_same_name_and_unit_are_summed() {
        let list = ShoppingList::aggregate([
            IngredientLine::new("Flour", "g", 100),
            IngredientLine::new("Flour", "g", 250),
        ]);

        assert_eq!(list.items(), &[entry("Flour", "g", 350)]);
    }

    #[test]
    fn test_different_units_stay_apart() {
        let list = ShoppingList::aggregate([
            IngredientLine::new("Flour", "g", 100),
            IngredientLine::new("Flour", "kg", 1),
        ]);

        assert_eq!(
            list.items(),
            &[entry("Flour", "g", 100), entry("Flour", "kg", 1)]
        );
    }

    #[test]
    fn test_names_are_not_normalized() {
        let list = ShoppingList::aggregate([
            IngredientLine::new("Flour", "g", 1),
            IngredientLine::new("flour", "g", 1),
            IngredientLine::new("Flour ", "g", 1),
        ]);

        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_order_ignores_input_order() {
        let lines = vec![
            IngredientLine::new("Sugar", "g", 5),
            IngredientLine::new("Eggs", "pcs", 2),
            IngredientLine::new("Milk", "ml", 200),
            IngredientLine::new("Eggs", "pcs", 1),
        ];
        let mut reversed = lines.clone();
        reversed.reverse();

        let list = ShoppingList::aggregate(lines);
        assert_eq!(list, ShoppingList::aggregate(reversed));

        let names: Vec<_> = list
            .items()
            .iter()
            .map(|i| i.ingredient_name.as_str())
            .collect();
        assert_eq!(names, ["Eggs", "Milk", "Sugar"]);
    }

    #[test]
    fn test_totals_are_conserved() {
        let lines: Vec<_> = (0..200u32)
            .map(|i| IngredientLine::new(format!("Item {}", i % 7), "g", i + 1))
            .collect();
        let expected: u64 = lines.iter().map(|l| u64::from(l.amount)).sum();

        let list = ShoppingList::aggregate(lines.clone());
        assert_eq!(list.len(), 7);
        assert_eq!(
            list.items().iter().map(|i| i.total_amount).sum::<u64>(),
            expected
        );

        for item in list.items() {
            let per_key: u64 = lines
                .iter()
                .filter(|l| l.ingredient_name == item.ingredient_name && l.unit == item.unit)
                .map(|l| u64::from(l.amount))
                .sum();
            assert_eq!(item.total_amount, per_key);
        }
    }

    #[test]
    fn test_totals_do_not_overflow() {
        let list = ShoppingList::aggregate([
            IngredientLine::new("Rice", "g", u32::MAX),
            IngredientLine::new("Rice", "g", u32::MAX),
        ]);

        assert_eq!(list.items()[0].total_amount, 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_line_format() {
        assert_eq!(entry("Flour", "g", 350).line(), "Flour, g:   350");
    }

    #[tokio::test]
    async fn test_build_from_store() -> anyhow::Result<()> {
        let store = MemoryStore(vec![
            IngredientLine::new("Milk", "ml", 200),
            IngredientLine::new("Milk", "ml", 300),
        ]);

        let list = build_shopping_list(&store, "john").await?;
        assert_eq!(list.items(), &[entry("Milk", "ml", 500)]);

        let empty = build_shopping_list(&MemoryStore(vec![]), "john").await?;
        assert!(empty.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_store_failure_is_retryable() {
        let err = build_shopping_list(&FailingStore, "john").await.unwrap_err();

        assert!(matches!(err, ExportError::DataAccess(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_store_read_deadline() {
        let err = build_shopping_list_within(&SlowStore, "john", Duration::from_millis(50))
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Timeout));
        assert!(err.is_retryable());
    }
}
