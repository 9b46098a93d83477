//! Hard-coded fixture inputs for the storefront under test

/// Target site and route paths
pub mod urls {
    /// Default origin of the storefront
    pub const BASE: &str = "https://www.saucedemo.com";

    pub const LOGIN: &str = "/";
    pub const INVENTORY: &str = "/inventory.html";
    pub const CART: &str = "/cart.html";
    pub const CHECKOUT_STEP_ONE: &str = "/checkout-step-one.html";
    pub const CHECKOUT_STEP_TWO: &str = "/checkout-step-two.html";
    pub const CHECKOUT_COMPLETE: &str = "/checkout-complete.html";

    /// Client-side routes of the single-page app. The static host answers
    /// 404 for these when requested directly.
    pub const SPA_ROUTES: [&str; 5] = [
        INVENTORY,
        CART,
        CHECKOUT_STEP_ONE,
        CHECKOUT_STEP_TWO,
        CHECKOUT_COMPLETE,
    ];

    /// Join a base URL and a route path.
    ///
    /// Absolute URLs are returned unchanged.
    pub fn absolute(base: &str, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = base.trim_end_matches('/');
        if path.is_empty() {
            return format!("{}/", base);
        }
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// Test user credentials
pub mod users {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Credentials {
        pub username: &'static str,
        pub password: &'static str,
    }

    const PASSWORD: &str = "secret_sauce";

    pub const STANDARD: Credentials = Credentials {
        username: "standard_user",
        password: PASSWORD,
    };

    pub const LOCKED_OUT: Credentials = Credentials {
        username: "locked_out_user",
        password: PASSWORD,
    };

    pub const PROBLEM: Credentials = Credentials {
        username: "problem_user",
        password: PASSWORD,
    };

    pub const PERFORMANCE_GLITCH: Credentials = Credentials {
        username: "performance_glitch_user",
        password: PASSWORD,
    };

    pub const ERROR: Credentials = Credentials {
        username: "error_user",
        password: PASSWORD,
    };

    pub const VISUAL: Credentials = Credentials {
        username: "visual_user",
        password: PASSWORD,
    };
}

/// Error messages rendered by the storefront
pub mod messages {
    pub const LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out.";
    pub const INVALID_CREDENTIALS: &str =
        "Epic sadface: Username and password do not match any user in this service";
    pub const USERNAME_REQUIRED: &str = "Epic sadface: Username is required";
    pub const PASSWORD_REQUIRED: &str = "Epic sadface: Password is required";
    pub const FIRST_NAME_REQUIRED: &str = "Error: First Name is required";
    pub const LAST_NAME_REQUIRED: &str = "Error: Last Name is required";
    pub const POSTAL_CODE_REQUIRED: &str = "Error: Postal Code is required";
}

/// Product catalog
pub mod products {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Product {
        pub name: &'static str,
        /// Display price, e.g. `$29.99`
        pub price: &'static str,
    }

    impl Product {
        /// Price in cents, parsed from the display string.
        pub fn cents(&self) -> Option<u64> {
            parse_price_cents(self.price)
        }
    }

    /// Parse a `$dollars.cents` display price.
    pub fn parse_price_cents(price: &str) -> Option<u64> {
        let digits = price.trim().strip_prefix('$')?;
        let (dollars, cents) = digits.split_once('.')?;
        if cents.len() != 2 {
            return None;
        }
        let dollars: u64 = dollars.parse().ok()?;
        let cents: u64 = cents.parse().ok()?;
        Some(dollars * 100 + cents)
    }

    /// Render cents as a display price.
    pub fn format_price(cents: u64) -> String {
        format!("${}.{:02}", cents / 100, cents % 100)
    }

    pub const BACKPACK: Product = Product {
        name: "Sauce Labs Backpack",
        price: "$29.99",
    };
    pub const BIKE_LIGHT: Product = Product {
        name: "Sauce Labs Bike Light",
        price: "$9.99",
    };
    pub const BOLT_TSHIRT: Product = Product {
        name: "Sauce Labs Bolt T-Shirt",
        price: "$15.99",
    };
    pub const FLEECE_JACKET: Product = Product {
        name: "Sauce Labs Fleece Jacket",
        price: "$49.99",
    };
    pub const ONESIE: Product = Product {
        name: "Sauce Labs Onesie",
        price: "$7.99",
    };
    pub const RED_TSHIRT: Product = Product {
        name: "Test.allTheThings() T-Shirt (Red)",
        price: "$15.99",
    };

    /// Every product, in the storefront's default (name A to Z) order
    pub const CATALOG: [Product; 6] = [
        BACKPACK,
        BIKE_LIGHT,
        BOLT_TSHIRT,
        FLEECE_JACKET,
        ONESIE,
        RED_TSHIRT,
    ];

    /// Sum of display prices, rendered the way the checkout overview does.
    pub fn subtotal(items: &[Product]) -> Option<String> {
        let mut total = 0;
        for item in items {
            total += item.cents()?;
        }
        Some(format_price(total))
    }
}

/// Checkout test data
pub mod test_data {
    pub const FIRST_NAME: &str = "John";
    pub const LAST_NAME: &str = "Doe";
    pub const ZIP_CODE: &str = "12345";

    pub const PAYMENT_INFO: &str = "SauceCard #31337";
    pub const SHIPPING_INFO: &str = "Free Pony Express Delivery!";
}
