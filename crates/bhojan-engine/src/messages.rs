// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message composition.
//!
//! Every reply the engine produces is plain text; "buttons" are rendered as
//! short command hints. Amounts are whole rupees. Customer-facing status
//! messages follow the order lifecycle; operator-facing messages carry the
//! order reference and the command vocabulary.

use bhojan_core::types::{Order, OrderStatus, OrderType, PaymentMethod, PaymentStatus};

/// Which heading a restaurant list gets, depending on how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListHeading {
    /// First list after a fresh location share.
    Fresh,
    /// Re-ranked after declining a closed restaurant.
    Other,
    /// Re-ranked from the cached location after a "use same" confirmation.
    CachedLocation,
}

pub fn location_prompt() -> String {
    "👋 *Welcome to Food Delivery!*\n\n\
     📍 To find restaurants near you, please *share your location*.\n\n\
     📱 *How to share location:*\n\
     1. Tap the 📎 (attachment) icon\n\
     2. Select *Location*\n\
     3. Choose *Share Live Location* or *Send Current Location*"
        .to_string()
}

pub fn welcome_back(customer_name: &str) -> String {
    format!(
        "👋 *Welcome back {customer_name}!*\n\n\
         📍 I have your location from before.\n\n\
         Would you like to:\n\n\
         1️⃣ *Use same location*\n\
         2️⃣ *Change location*"
    )
}

pub fn restaurant_list(heading: ListHeading, restaurants_link: &str) -> String {
    let title = match heading {
        ListHeading::Fresh => "📍 *Restaurants Near You*",
        ListHeading::Other => "📍 *Other Restaurants Near You*",
        ListHeading::CachedLocation => "📍 *Using your previous location*",
    };
    format!(
        "{title}\n\n\
         🔗 *Tap to browse restaurants with filters:*\n\
         {restaurants_link}\n\n\
         ✨ Filter by distance, cuisine type (Veg/Non-Veg/Snack/Full Meal) and select your restaurant!"
    )
}

pub fn no_restaurants() -> String {
    "😔 Sorry, we couldn't find any restaurants near your location.\n\n\
     Please share your location again or try a different area."
        .to_string()
}

pub fn qr_welcome_share_location(restaurant_name: &str) -> String {
    format!(
        "👋 *Welcome to {restaurant_name}!*\n\n\
         📍 To continue, please *share your location*.\n\n\
         📱 *How to share location:*\n\
         1. Tap the 📎 (attachment) icon\n\
         2. Select *Location*\n\
         3. Choose *Share Live Location* or *Send Current Location*"
    )
}

pub fn qr_welcome_known_location(restaurant_name: &str) -> String {
    format!(
        "👋 *Welcome to {restaurant_name}!*\n\n\
         📍 I have your location from before.\n\n\
         Would you like to:\n\n\
         1️⃣ *Use same location*\n\
         2️⃣ *Change location*"
    )
}

pub fn menu_link_message(restaurant_name: &str, menu_link: &str) -> String {
    format!(
        "🍽️ *{restaurant_name}*\n\n\
         🔗 *Tap to view menu and order:*\n\
         {menu_link}\n\n\
         ✨ Browse menu, add items to cart, and place your order!"
    )
}

pub fn selection_success(restaurant_name: &str, menu_link: &str) -> String {
    format!(
        "✅ *{restaurant_name}* selected!\n\n\
         🍽️ *View Menu & Place Order*\n\
         ━━━━━━━━━━━━━━━━\n\n\
         📱 *Tap the link below to view menu:*\n\n\
         {menu_link}\n\n\
         ✨ Add items to cart and place order securely.\n\n\
         🙏 Thank you for choosing us!"
    )
}

pub fn restaurant_closed(restaurant_name: &str) -> String {
    format!(
        "🔴 *{restaurant_name} is currently CLOSED*\n\n\
         Would you like to explore other restaurants nearby?\n\n\
         1️⃣ *Yes - Show nearby restaurants*\n\
         2️⃣ *No - Maybe later*"
    )
}

pub fn closed_declined() -> String {
    "👍 No problem! Feel free to come back when we're open. 🙏".to_string()
}

pub fn invalid_selection() -> String {
    "❌ Restaurant not found. Please reply with a valid restaurant number or name from the list above."
        .to_string()
}

pub fn share_location_again() -> String {
    "📍 Please share your location again to see nearby restaurants.".to_string()
}

pub fn menu_ack() -> String {
    "✅ Order received! We're processing your order.\n\n\
     Your order details will be confirmed shortly."
        .to_string()
}

pub fn invalid_location() -> String {
    "❌ Invalid location. Please share your location again.".to_string()
}

pub fn apology() -> String {
    "😔 Sorry, something went wrong on our side. Please try again in a moment.".to_string()
}

fn rupees(amount: f64) -> String {
    format!("₹{amount:.0}")
}

fn items_block(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|item| {
            format!("• {} x{} - {}", item.name, item.quantity, rupees(item.line_total()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Customer-facing message for the order's current status. For `ready`
/// pickup orders, `pickup_directions` carries the restaurant address and a
/// map link.
pub fn customer_status_message(
    order: &Order,
    restaurant_name: &str,
    pickup_directions: Option<(&str, &str)>,
) -> String {
    let short = order.short_id();
    let name = &order.customer_name;
    let total = rupees(order.total_amount);
    match order.status {
        OrderStatus::Pending => {
            let payment = match order.payment_method {
                PaymentMethod::Cod => "Cash on Delivery",
                PaymentMethod::Online => "Online Payment",
            };
            let order_type = match order.order_type {
                OrderType::Pickup => "Pickup",
                OrderType::Delivery => "Delivery",
            };
            format!(
                "✅ *Order Confirmed!*\n\n\
                 Hi {name}!\n\n\
                 Your order #{short} has been received and is now pending.\n\n\
                 *Restaurant:* {restaurant_name}\n\
                 *Order Type:* {order_type}\n\
                 *Total:* {total}\n\n\
                 *Items:*\n{}\n\n\
                 *Payment:* {payment}\n\n\
                 We'll notify you when we start preparing your order! 🍽️",
                items_block(order)
            )
        }
        OrderStatus::Preparing => format!(
            "👨‍🍳 *Order Being Prepared*\n\n\
             Hi {name}!\n\n\
             Great news! Your order #{short} is now being prepared in our kitchen.\n\n\
             *Restaurant:* {restaurant_name}\n\
             *Total:* {total}\n\n\
             We'll notify you as soon as it's ready. Estimated time: 15-20 minutes ⏰"
        ),
        OrderStatus::Ready => {
            let handoff = match (order.order_type, pickup_directions) {
                (OrderType::Delivery, _) => {
                    "Your order will be delivered to you shortly.".to_string()
                }
                (OrderType::Pickup, Some((address, map))) => format!(
                    "Please come to pick up your order.\n\n\
                     📍 *Address:* {address}\n\
                     🗺️ {map}"
                ),
                (OrderType::Pickup, None) => "Please come to pick up your order.".to_string(),
            };
            format!(
                "🎉 *Order Ready!*\n\n\
                 Hi {name}!\n\n\
                 Your order #{short} is ready!\n\n\
                 *Restaurant:* {restaurant_name}\n\
                 *Total:* {total}\n\n\
                 {handoff}\n\n\
                 Thank you for choosing us! 🙏"
            )
        }
        OrderStatus::Delivered => format!(
            "✅ *Order Delivered!*\n\n\
             Hi {name}!\n\n\
             Your order #{short} has been successfully delivered to you.\n\n\
             *Total:* {total}\n\n\
             Thank you for your order! We hope you enjoyed it. 😊\n\n\
             Please rate your experience and visit us again! ⭐"
        ),
        OrderStatus::Cancelled => format!(
            "❌ *Order Cancelled*\n\n\
             Hi {name}!\n\n\
             Unfortunately, your order #{short} has been cancelled.\n\n\
             *Restaurant:* {restaurant_name}\n\
             *Order Total:* {total}\n\n\
             If you made a payment, it will be refunded to your account within 3-5 business days.\n\n\
             We sincerely apologize for any inconvenience caused. 😔\n\n\
             *Please help us improve by sharing your feedback:*\n\n\
             🌟 Rate your experience: Reply with a rating from 1-5 stars\n\
             💬 Share your feedback: Send your comments or suggestions\n\n\
             Your feedback helps us serve you better! 🙏"
        ),
    }
}

/// New-order alert for the restaurant operator, with command hints.
pub fn new_order_alert(order: &Order) -> String {
    let short = order.short_id();
    let order_type = match order.order_type {
        OrderType::Pickup => "Pickup",
        OrderType::Delivery => "Delivery",
    };
    let payment = match order.payment_method {
        PaymentMethod::Cod => "Cash on Delivery".to_string(),
        PaymentMethod::Online => format!("Online ({})", order.payment_status),
    };
    let mut hints = format!(
        "ACCEPT {short} - Acknowledge order\n\
         PREPARE {short} - Start preparing\n\
         READY {short} - Mark as ready\n\
         DELIVERED {short} - Mark as delivered\n\
         CANCEL {short} - Cancel order"
    );
    if order.payment_method == PaymentMethod::Online
        && order.payment_status != PaymentStatus::Verified
    {
        hints.push_str(&format!("\nVERIFY {short} - Confirm payment received"));
    }
    let mut body = format!(
        "🔔 *New Order Received!*\n\n\
         Order: #{short}\n\
         Customer: {}\n\
         Phone: {}\n\
         Type: {order_type}\n\n\
         *Items:*\n{}\n",
        order.customer_name,
        order.contact,
        items_block(order)
    );
    if order.delivery_fee > 0.0 {
        body.push_str(&format!("Delivery Fee: {}\n", rupees(order.delivery_fee)));
    }
    body.push_str(&format!(
        "*Total: {}*\n\n\
         Payment: {payment}\n\n\
         *Reply with a command:*\n{hints}",
        rupees(order.total_amount)
    ));
    body
}

fn status_emoji(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending | OrderStatus::Delivered => "✅",
        OrderStatus::Preparing => "👨‍🍳",
        OrderStatus::Ready => "🎉",
        OrderStatus::Cancelled => "❌",
    }
}

/// Operator confirmation after a committed status change.
pub fn status_updated(order: &Order) -> String {
    format!(
        "{} Order {} updated to: *{}*\n\n\
         Customer: {}\n\
         Total: {}",
        status_emoji(order.status),
        order.short_id(),
        order.status.to_string().to_uppercase(),
        order.customer_name,
        rupees(order.total_amount)
    )
}

/// Operator acknowledgement for ACCEPT; the order stays pending.
pub fn accept_ack(order: &Order) -> String {
    format!(
        "✅ Order {} received and acknowledged.\n\n\
         Customer: {}\n\
         Total: {}",
        order.short_id(),
        order.customer_name,
        rupees(order.total_amount)
    )
}

pub fn payment_verified_customer(order: &Order) -> String {
    format!(
        "✅ *Payment Verified*\n\n\
         Your payment of {} for order #{} has been verified by the restaurant.\n\n\
         Your order is now being prepared! 🍽️\n\n\
         Thank you for your order!",
        rupees(order.total_amount),
        order.short_id()
    )
}

pub fn payment_verified_operator(order: &Order) -> String {
    format!(
        "💳 *Payment Verified*\n\n\
         Order: #{}\n\
         Customer: {}\n\
         Amount: {}\n\n\
         ✅ Customer has been notified.",
        order.short_id(),
        order.customer_name,
        rupees(order.total_amount)
    )
}

fn short_ref(order_ref: &str) -> &str {
    let n = order_ref.len().min(8);
    &order_ref[..n]
}

pub fn order_not_found(order_ref: &str) -> String {
    format!("❌ Order {} not found.", short_ref(order_ref))
}

pub fn foreign_order(order_ref: &str) -> String {
    format!("❌ Order {} does not belong to your restaurant.", short_ref(order_ref))
}

pub fn not_online_payment(order_ref: &str) -> String {
    format!(
        "❌ Order {} is not an online payment order. Payment verification not applicable.",
        short_ref(order_ref)
    )
}

pub fn already_verified(order_ref: &str) -> String {
    format!("✅ Payment for order {} is already verified.", short_ref(order_ref))
}

pub fn invalid_transition(order_ref: &str, current: OrderStatus) -> String {
    format!(
        "❌ Order {} is already *{}* and cannot be moved backwards.",
        short_ref(order_ref),
        current.to_string().to_uppercase()
    )
}

pub fn unknown_command() -> String {
    "❌ Unknown command. Use ACCEPT, PREPARE, READY, DELIVERED, CANCEL or VERIFY followed by the order number."
        .to_string()
}
