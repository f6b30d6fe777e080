//! Rupee amounts spelled out in Indian English (crore / lakh grouping)

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];
const TEENS: [&str; 10] = [
    "Ten", "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen",
    "Eighteen", "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

fn below_thousand(n: u64, out: &mut Vec<&'static str>) {
    debug_assert!(n < 1000);
    if n >= 100 {
        out.push(ONES[(n / 100) as usize]);
        out.push("Hundred");
    }
    let rest = n % 100;
    match rest {
        0 => {}
        1..=9 => out.push(ONES[rest as usize]),
        10..=19 => out.push(TEENS[(rest - 10) as usize]),
        _ => {
            out.push(TENS[(rest / 10) as usize]);
            if rest % 10 > 0 {
                out.push(ONES[(rest % 10) as usize]);
            }
        }
    }
}

fn whole_number(n: u64, out: &mut Vec<&'static str>) {
    let crores = n / CRORE;
    if crores > 0 {
        // Crores above 999 keep grouping recursively
        whole_number(crores, out);
        out.push("Crore");
    }
    let lakhs = (n % CRORE) / LAKH;
    if lakhs > 0 {
        below_thousand(lakhs, out);
        out.push("Lakh");
    }
    let thousands = (n % LAKH) / THOUSAND;
    if thousands > 0 {
        below_thousand(thousands, out);
        out.push("Thousand");
    }
    below_thousand(n % THOUSAND, out);
}

/// Spell out a rupee amount, e.g. `1250.5` becomes
/// "One Thousand Two Hundred Fifty Rupees and Fifty Paise Only".
///
/// Paise are rounded to the nearest whole paisa. Below one rupee the rupee
/// count is left out ("Rupees and Fifty Paise Only"); only a zero amount reads
/// "Zero Rupees Only". Callers must pass a finite, non-negative amount.
pub fn amount_in_words(amount: f64) -> String {
    let total_paise = (amount * 100.0).round() as u64;
    let rupees = total_paise / 100;
    let paise = total_paise % 100;

    if total_paise == 0 {
        return "Zero Rupees Only".to_string();
    }

    let mut words = Vec::new();
    whole_number(rupees, &mut words);
    words.push("Rupees");
    if paise > 0 {
        words.push("and");
        below_thousand(paise, &mut words);
        words.push("Paise");
    }
    words.push("Only");
    words.join(" ")
}
