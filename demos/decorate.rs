use anyhow::Context;
use price_decorator::{
    DecoratedPrice, DecoratorRegistry, PricedEntity, Transform,
    registry::{CDN, FEDTAX, MONEY, QUEBEC},
};
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    // list based: decorations are recorded on the entity itself
    let mut sale = PricedEntity::new(100.0)?;
    sale.decorate(FEDTAX).decorate(QUEBEC).decorate(MONEY);
    info!(decorators = ?sale.decorators(), price = %sale.get_price()?, "list sale");

    sale.undecorate();
    info!(decorators = ?sale.decorators(), price = %sale.get_price()?, "after undecorate");

    // chained: every decoration is a new value, the base stays usable
    let base = DecoratedPrice::default();
    let dollars = base.decorate(FEDTAX).decorate(MONEY);
    let canadian = base.decorate(QUEBEC).decorate(CDN);
    info!(price = %base.get_price()?, "chained base");
    info!(price = %dollars.get_price()?, "chained federal");
    info!(price = %canadian.get_price()?, "chained provincial");

    // a registry extended with a flat surcharge, injected into the entity
    let mut registry = DecoratorRegistry::with_defaults();
    registry.register("shipping", Transform::surcharge(15.0));
    let mut shipped = PricedEntity::with_registry(49.99, Arc::new(registry))?;
    shipped.decorate("shipping").decorate(FEDTAX).decorate(MONEY);
    info!(price = %shipped.get_price()?, "shipped sale");

    // formatting before taxing is a usage error
    let mut broken = PricedEntity::default();
    broken.decorate(MONEY).decorate(FEDTAX);
    if let Err(e) = broken.get_price() {
        error!(cause = %e, "rejected decoration order");
    }

    Ok(())
}
