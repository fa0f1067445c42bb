//! Cart Store entry point
//!
//! On the web the JS side drives the cart through `WebCart`; this only sets
//! up logging. Natively it runs a short session against the configured
//! storage and prints the resulting cart.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Cart store ready");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cart_store::storage::FileStorage;
    use cart_store::{CartConfig, CartContext, CartProvider, MemoryStorage, NewProduct};

    env_logger::init();

    let config = CartConfig::from_env();
    log::info!("Cart store (native) starting, key '{}'", config.products_key());

    let mut provider = CartProvider::new();
    let cart: CartContext = match &config.storage_dir {
        Some(dir) => match FileStorage::open(dir) {
            Ok(storage) => provider.init(storage, &config),
            Err(e) => {
                log::error!("Cannot open {}: {}; using memory storage", dir.display(), e);
                provider.init(MemoryStorage::new(), &config)
            }
        },
        None => provider.init(MemoryStorage::new(), &config),
    };

    cart.subscribe(|products| {
        log::debug!("Cart changed ({} lines)", products.len());
    });

    let session = [
        NewProduct::new("1234", "Cadeira Rivatti", "https://example.com/cadeira.png", 1400.9),
        NewProduct::new("5678", "Poltrona de madeira", "https://example.com/poltrona.png", 2300.0),
    ];
    for item in session {
        if let Err(e) = cart.add_to_cart(item) {
            log::error!("add_to_cart failed: {}", e);
        }
    }
    if let Err(e) = cart.increment("1234") {
        log::error!("increment failed: {}", e);
    }
    if let Err(e) = cart.decrement("5678") {
        log::error!("decrement failed: {}", e);
    }

    println!("Cart ({}):", config.products_key());
    for product in cart.products() {
        println!(
            "  {:<8} {:<24} {:>3} x {:>9.2} = {:>10.2}",
            product.id,
            product.title,
            product.quantity,
            product.price,
            product.subtotal()
        );
    }
    println!(
        "  {} items, total {:.2}",
        cart.total_quantity(),
        cart.total_price()
    );
}
