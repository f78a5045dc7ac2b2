//! Calculadora de gastos de conductor
//!
//! Copia los defaults de una ruta sobre un viaje. Las líneas de categoría
//! driver-cost se prorratean por la tasa del tipo de vehículo (porcentaje
//! 0-100+); el resto de líneas y los campos planos de la ruta (peaje,
//! subcontratista, otros) se copian tal cual, sin prorrateo.
//!
//! Semántica numérica: cada línea se redondea primero (half-up a 2
//! decimales) y la suma se calcula sobre las líneas ya redondeadas, de modo
//! que el total almacenado siempre coincide con la suma de las líneas que ve
//! el usuario final.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::expense::{ExpensePlan, PlannedExpenseLine};
use crate::models::route::RouteWithExpenses;

/// Precisión monetaria de la moneda configurada
const MONEY_DECIMALS: u32 = 2;

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

fn prorate(amount: Decimal, rate: Decimal) -> Decimal {
    round_money(amount * rate / Decimal::ONE_HUNDRED)
}

/// Aplica los defaults de la ruta con la tasa del vehículo asignado.
///
/// Devuelve las líneas listas para persistir más los campos de costo del
/// viaje. `driver_cost` es la suma de las líneas driver-cost ya redondeadas;
/// si la ruta no itemiza gastos de conductor, se prorratea su monto plano.
pub fn compute_from_route(route: &RouteWithExpenses, vehicle_expense_rate: Decimal) -> ExpensePlan {
    let mut lines = Vec::with_capacity(route.driver_expenses.len());
    let mut driver_cost_sum = Decimal::ZERO;
    let mut has_driver_cost_lines = false;

    for expense in &route.driver_expenses {
        let amount = if expense.is_driver_cost {
            has_driver_cost_lines = true;
            prorate(expense.amount, vehicle_expense_rate)
        } else {
            expense.amount
        };

        if expense.is_driver_cost {
            driver_cost_sum += amount;
        }

        lines.push(PlannedExpenseLine {
            expense_type_id: expense.expense_type_id,
            expense_type_key: expense.expense_type_key.clone(),
            is_driver_cost: expense.is_driver_cost,
            amount,
        });
    }

    let driver_cost = if has_driver_cost_lines {
        Some(driver_cost_sum)
    } else {
        route
            .route
            .driver_cost
            .map(|flat| prorate(flat, vehicle_expense_rate))
    };

    ExpensePlan {
        lines,
        driver_cost,
        bridge_toll: route.route.bridge_toll,
        subcontractor_cost: route.route.subcontractor_cost,
        other_cost: route.route.other_cost,
    }
}
